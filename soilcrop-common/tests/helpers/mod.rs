//! Shared helpers for integration tests: throwaway HTTP servers on loopback

#![allow(dead_code)]

use axum::Router;
use soilcrop_common::{FormField, FormFieldState};
use std::net::SocketAddr;

/// Serve `router` on an ephemeral loopback port
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr = listener.local_addr().expect("Should have local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });
    addr
}

/// Address nothing is listening on
pub async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    listener.local_addr().expect("Should have local address")
}

/// Form with every field filled with valid values
pub fn complete_form() -> FormFieldState {
    let mut form = FormFieldState::new();
    form.set(FormField::SoilType, "Clay");
    let values = ["10", "6.5", "1.3", "0.5", "0.8", "25", "0.2", "1.5", "30"];
    for (field, value) in FormField::NUMERIC.into_iter().zip(values) {
        form.set(field, value);
    }
    form
}

//! Shared fixtures for the mock-server tests

#![allow(dead_code)]

use cnvsweb_core::ClientConfig;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "CZR0775V";

/// Config pointed at the mock server, without request pacing
pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        requests_per_second: 0.0,
        ..ClientConfig::default()
    }
}

/// Mounts the login page, the AJAX endpoint and a landing page
///
/// The endpoint only answers "success" for [`TOKEN`].
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "cf_clearance=abc; Path=/")
                .set_body_string("<html><body><form id=\"login\"></form></body></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ajax/login.php"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(body_string_contains(format!("token={}", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "redirect": format!("{}/home", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Bem-vindo</body></html>"))
        .mount(server)
        .await;
}

/// Number of GET requests the server saw for `route`
pub async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == "GET" && r.url.path() == route)
        .count()
}

pub fn card(id: u32, title: &str, label: &str) -> String {
    format!(
        r#"<div class="item">
            <div class="poster"><img src="https://img.cnvs/{id}.jpg"></div>
            <div class="info">
                <h6>{title}</h6>
                <p class="tags"><span>{label}</span><span>2021</span><span>8.1</span></p>
                <a href="/watch/{id}">Assistir</a>
            </div>
        </div>"#
    )
}

pub fn landing_page(cards: &str) -> String {
    format!(
        r#"<html><body>
        <div class="row">
            <div class="col-12">
                <h5>Mais Visto</h5>
                <div class="items">{cards}</div>
            </div>
        </div>
        </body></html>"#
    )
}

pub fn search_page(cards: &str) -> String {
    format!(r#"<html><body><div class="results">{cards}</div></body></html>"#)
}

//! Manual driver for the directory API.
//!
//! Run the server, then:
//! ```sh
//! cargo run -p tester                      # replay the lockout scenario
//! ADMIN_PASSWORD=... cargo run -p tester   # also exercise the admin flow
//! ```
//! Lockout state is in-memory, so restart the server between runs.

use serde_json::json;

const BASE: &str = "http://localhost:1111";

#[tokio::main]
async fn main() {
    let client = reqwest::Client::new();

    for attempt in 1..=3 {
        let response = client
            .post(format!("{BASE}/api/admin/login"))
            .json(&json!({ "password": "wrong" }))
            .send()
            .await
            .unwrap();

        println!(
            "login #{attempt} (wrong) -> {} {}",
            response.status(),
            response.text().await.unwrap()
        );
    }

    let response = client
        .get(format!("{BASE}/api/admin/status"))
        .send()
        .await
        .unwrap();
    println!("status -> {}", response.text().await.unwrap());

    let Ok(password) = std::env::var("ADMIN_PASSWORD") else {
        println!("ADMIN_PASSWORD not set, skipping admin flow");
        return;
    };

    // This should still be rejected: the lockout outranks a correct password.
    let response = client
        .post(format!("{BASE}/api/admin/login"))
        .json(&json!({ "password": password }))
        .send()
        .await
        .unwrap();
    println!(
        "login (correct, while locked) -> {} {}",
        response.status(),
        response.text().await.unwrap()
    );
}

/* demos/axum.rs */

use axum::{Router, extract::ConnectInfo, http::HeaderMap, response::Json, routing::get};
use forwarded_ip::{ForwardHeader, HeaderKind, IpExtractor, REAL_IP_HEADERS, RealIp, RealIpLayer};
use serde_json::json;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("forwarded_ip=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;

    println!("Server starting on http://localhost:3000");
    println!("Test endpoints:");
    println!("  • GET /        - Plain text client address");
    println!("  • GET /ip      - JSON response with IP details");
    println!("  • GET /fly/ip  - Same, with Fly-Client-IP checked first");
    println!("  • GET /debug   - Proxy headers and connection info");
    println!();
    println!("Test with headers:");
    println!("  curl -H 'X-Real-IP: 203.0.113.42' http://localhost:3000/ip");
    println!("  curl -H 'X-Forwarded-For: unknown, 198.51.100.1' http://localhost:3000/ip");
    println!("  curl -H 'CF-Connecting-IP: 2001:db8::1' http://localhost:3000/");
    println!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn create_app() -> Router {
    let default_router = Router::new()
        .route("/", get(hello_handler))
        .route("/ip", get(ip_handler))
        .route("/debug", get(debug_handler))
        .layer(RealIpLayer::default());

    let fly = IpExtractor::new().with_headers(
        std::iter::once(ForwardHeader::custom("Fly-Client-IP", HeaderKind::Single))
            .chain(REAL_IP_HEADERS)
            .collect(),
    );
    let fly_router = Router::new()
        .route("/ip", get(ip_handler))
        .layer(RealIpLayer::with_extractor(fly));

    default_router.nest("/fly", fly_router)
}

/// Client address formatted with the connection's port
async fn hello_handler(real_ip: RealIp, ConnectInfo(addr): ConnectInfo<SocketAddr>) -> String {
    format!("Hello, {}\n", real_ip.address(addr.port()))
}

/// IP information in JSON format
async fn ip_handler(real_ip: Option<RealIp>) -> Json<serde_json::Value> {
    match real_ip {
        Some(real_ip) => {
            let ip = real_ip.ip();
            Json(json!({
                "real_ip": ip.to_string(),
                "ip_version": match ip {
                    std::net::IpAddr::V4(_) => "IPv4",
                    std::net::IpAddr::V6(_) => "IPv6",
                },
                "is_loopback": ip.is_loopback(),
            }))
        }
        None => Json(json!({"error": "Could not determine real IP"})),
    }
}

/// Proxy headers seen by the extractor next to the raw connection
async fn debug_handler(
    real_ip: RealIp,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let ip_headers: serde_json::Map<String, serde_json::Value> = REAL_IP_HEADERS
        .iter()
        .filter_map(|header| {
            let value = headers.get(header.name())?.to_str().ok()?;
            Some((header.name().to_string(), json!(value)))
        })
        .collect();

    let source = IpExtractor::default()
        .extract_with_source(&headers)
        .map(|(_, header)| header.name().to_string());

    Json(json!({
        "extracted_real_ip": real_ip.ip().to_string(),
        "connection_info": {
            "remote_addr": addr.to_string(),
            "remote_ip": addr.ip().to_string(),
            "remote_port": addr.port(),
        },
        "ip_related_headers": ip_headers,
        "analysis": {
            "ip_source": source.unwrap_or_else(|| "connection_fallback".to_string()),
            "ip_matches_connection": real_ip.ip() == addr.ip(),
        }
    }))
}

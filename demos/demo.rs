/* demos/demo.rs */

use forwarded_ip::{
    ForwardHeader, HeaderKind, HeaderMap, IpExtractor, X_REAL_IP, extract_real_ip,
    format_address, format_address_str, real_ip_from_headers,
};

fn main() {
    println!("=== Forwarded IP Examples ===\n");

    // Example 1: Basic X-Real-IP header
    example_1_x_real_ip();

    // Example 2: X-Forwarded-For with malformed entries
    example_2_x_forwarded_for();

    // Example 3: Header priority
    example_3_header_priority();

    // Example 4: Fallback to remote address
    example_4_fallback();

    // Example 5: Custom extractor configuration
    example_5_custom_extractor();

    // Example 6: Address formatting
    example_6_format_address();

    println!("=== All examples completed! ===");
}

fn example_1_x_real_ip() {
    println!("Example 1: Basic X-Real-IP header");

    let headers = [("X-Real-IP", "203.0.113.45")];

    match real_ip_from_headers(&headers) {
        Some(ip) => println!("Extracted IP: {}", ip),
        None => println!("No IP found"),
    }
    println!();
}

fn example_2_x_forwarded_for() {
    println!("Example 2: X-Forwarded-For with malformed entries");

    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for".to_string(),
        "unknown, , 10.0.0.5, 8.8.8.8".to_string(),
    );

    match real_ip_from_headers(&headers) {
        Some(ip) => println!("Extracted IP (first valid in chain): {}", ip),
        None => println!("No IP found"),
    }
    println!();
}

fn example_3_header_priority() {
    println!("Example 3: Header priority");

    let mut headers = HeaderMap::new();
    headers.insert("x-real-ip".to_string(), "not-an-ip".to_string());
    headers.insert("cf-connecting-ip".to_string(), "198.51.100.200".to_string());
    headers.insert("true-client-ip".to_string(), "192.0.2.50".to_string());

    println!("Headers present:");
    for (key, value) in &headers {
        println!("  {}: {}", key, value);
    }

    let extractor = IpExtractor::default();
    match extractor.extract_with_source(&headers) {
        Some((ip, source)) => println!("Extracted IP from {}: {}", source.name(), ip),
        None => println!("No IP found"),
    }
    println!();
}

fn example_4_fallback() {
    println!("Example 4: Fallback to remote address");

    let headers = HeaderMap::new();
    let remote_addr = "192.0.2.123".parse().ok();

    match extract_real_ip(&headers, remote_addr) {
        Some(ip) => println!("Using fallback IP: {}", ip),
        None => println!("No IP found"),
    }
    println!();
}

fn example_5_custom_extractor() {
    println!("Example 5: Custom extractor configuration");

    let headers = [
        ("Fly-Client-IP", "203.0.113.200"),
        ("X-Real-IP", "192.168.1.50"),
    ];

    let custom_extractor = IpExtractor::new().with_headers(vec![
        ForwardHeader::custom("Fly-Client-IP", HeaderKind::Single),
        X_REAL_IP,
    ]);

    match custom_extractor.extract(&headers) {
        Some(ip) => println!("Custom extractor result: {}", ip),
        None => println!("Custom extractor: No IP found"),
    }

    match IpExtractor::default().extract(&headers) {
        Some(ip) => println!("Default extractor result: {}", ip),
        None => println!("Default extractor: No IP found"),
    }
    println!();
}

fn example_6_format_address() {
    println!("Example 6: Address formatting");

    for (ip, port) in [
        ("192.168.1.1", 8080),
        ("::1", 80),
        ("2001:0db8:0000:0000:0000:0000:0000:0001", 8080),
        ("::ffff:192.0.2.1", 443),
        ("not-an-ip", 80),
    ] {
        match format_address_str(ip, port) {
            Ok(addr) => println!("  {} port {} -> {}", ip, port, addr),
            Err(err) => println!("  {} port {} -> error: {}", ip, port, err),
        }
    }

    if let Some(ip) = real_ip_from_headers(&[("True-Client-IP", "2001:db8::42")]) {
        println!("  extracted + formatted: {}", format_address(ip, 9000));
    }
    println!();
}

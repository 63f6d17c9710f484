// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for contact form simulation.

use portfolio_api::submission::ContactRequest;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A submission every stage accepts.
pub fn genuine(i: usize) -> ContactRequest {
    ContactRequest {
        name: Some(format!("Visitor {i}")),
        email: Some(format!("visitor{i}@example.com")),
        subject: Some(format!("Project enquiry #{i}")),
        message: Some("Hello, I would like to talk about a project.".to_string()),
        honeypot: None,
    }
}

/// A bot filling in every field, the hidden one included.
pub fn honeypot(i: usize) -> ContactRequest {
    ContactRequest {
        honeypot: Some(format!("http://bot-{i}.example.net")),
        ..genuine(i)
    }
}

/// A well-formed submission carrying a blocked keyword.
pub fn keyword_spam(i: usize) -> ContactRequest {
    let keywords = ["viagra", "casino", "crypto", "lottery", "bitcoin"];
    ContactRequest {
        message: Some(format!(
            "Amazing {} offer for your site, act now!",
            keywords[i % keywords.len()]
        )),
        ..genuine(i)
    }
}

/// A well-formed submission with `links` URLs in the message.
pub fn link_spam(i: usize, links: usize) -> ContactRequest {
    let body = (0..links)
        .map(|n| format!("https://promo-{n}.example.net/deal"))
        .collect::<Vec<_>>()
        .join(" ");
    ContactRequest {
        message: Some(format!("Check these out: {body}")),
        ..genuine(i)
    }
}

/// Submissions failing one validation rule each.
pub fn generate_invalid() -> Vec<(&'static str, ContactRequest)> {
    vec![
        (
            "missing name",
            ContactRequest {
                name: None,
                ..genuine(0)
            },
        ),
        (
            "empty email",
            ContactRequest {
                email: Some(String::new()),
                ..genuine(0)
            },
        ),
        (
            "long name",
            ContactRequest {
                name: Some("n".repeat(101)),
                ..genuine(0)
            },
        ),
        (
            "long subject",
            ContactRequest {
                subject: Some("s".repeat(201)),
                ..genuine(0)
            },
        ),
        (
            "short message",
            ContactRequest {
                message: Some("too short".to_string()),
                ..genuine(0)
            },
        ),
        (
            "long message",
            ContactRequest {
                message: Some("m".repeat(5001)),
                ..genuine(0)
            },
        ),
        (
            "bad email",
            ContactRequest {
                email: Some("not-an-address".to_string()),
                ..genuine(0)
            },
        ),
    ]
}

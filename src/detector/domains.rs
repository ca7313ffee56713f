/// Sites whose pages are eligible for analysis. Subdomains are included.
pub const NEWS_DOMAINS: &[&str] = &[
    "oxu.az",
    "publika.az",
    "jam-news.net",
    "abzas.org",
    "abzas.net",
    "abzas.info",
    "azadliq.org",
    "bbc.com",
    "cnn.com",
    "reuters.com",
    "ap.org",
    "bloomberg.com",
    "nytimes.com",
    "washingtonpost.com",
    "theguardian.com",
    "independent.co.uk",
];

/// Lowercases the host and drops a leading `www.` and a trailing root dot.
pub fn normalize_hostname(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

pub fn is_news_domain(hostname: &str) -> bool {
    let host = normalize_hostname(hostname);
    NEWS_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.'))
    })
}

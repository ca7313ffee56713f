#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use lnk_lens::detector::classify_page;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let url = Url::parse("https://oxu.az/news/2024/05/01/fuzz").unwrap();

    let classification = classify_page(&url, &html);

    // a title is always produced
    assert!(!classification.article_info.title.is_empty());
});

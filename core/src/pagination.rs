//! Cursor pagination from the `Link` response header.
//!
//! A list response may carry
//! `Link: <https://shop/admin/api/2023-01/products.json?limit=1&page_info=abc>; rel="next"`.
//! The query parameters of each link are exposed as `Params` so they can be
//! passed straight back into `RestClient::all`.

use std::ops::Deref;

use reqwest::Url;

use crate::path::Params;
use crate::resource::Resource;

/// One page of a list response: the instances in response order plus the
/// cursors for adjacent pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Resource>,
    pub page_info: PageInfo,
}

impl Page {
    pub fn into_inner(self) -> Vec<Resource> {
        self.items
    }
}

impl Deref for Page {
    type Target = [Resource];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl IntoIterator for Page {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub next: Option<Params>,
    pub previous: Option<Params>,
}

impl PageInfo {
    pub fn from_link_header(header: Option<&str>) -> Self {
        let mut info = PageInfo::default();
        let Some(header) = header else {
            return info;
        };
        for link in header.split(',') {
            let Some((target, attrs)) = link.split_once(';') else {
                continue;
            };
            let target = target.trim().trim_start_matches('<').trim_end_matches('>');
            let Ok(url) = Url::parse(target) else {
                continue;
            };
            let params: Params = url.query_pairs().map(|(k, v)| (k, v.into_owned())).collect();
            for attr in attrs.split(';') {
                match attr.trim().strip_prefix("rel=").map(|r| r.trim_matches('"')) {
                    Some("next") => info.next = Some(params.clone()),
                    Some("previous") => info.previous = Some(params.clone()),
                    _ => {}
                }
            }
        }
        info
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_next_and_previous() {
        let header = "<https://test-shop.myshopify.io/admin/api/2023-01/products.json?limit=1&page_info=abc>; rel=\"next\", \
                      <https://test-shop.myshopify.io/admin/api/2023-01/products.json?limit=1&page_info=xyz>; rel=\"previous\"";
        let info = PageInfo::from_link_header(Some(header));
        let next = info.next.unwrap();
        assert_eq!(next.get("page_info"), Some("abc"));
        assert_eq!(next.get("limit"), Some("1"));
        assert_eq!(info.previous.unwrap().get("page_info"), Some("xyz"));
    }

    #[test]
    fn missing_header_means_single_page() {
        let info = PageInfo::from_link_header(None);
        assert!(!info.has_next());
        assert!(!info.has_previous());
    }

    #[test]
    fn malformed_links_are_skipped() {
        let info = PageInfo::from_link_header(Some("garbage, <not a url>; rel=\"next\""));
        assert_eq!(info, PageInfo::default());
    }
}

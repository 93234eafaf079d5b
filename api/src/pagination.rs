//! Page-numbered pagination for the list endpoint.

use serde::Deserialize;

use chainwatch_types::Page;

/// Default page size when `pageSize` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// `page`/`pageSize` query parameters accepted by the list endpoint.
///
/// Non-integer values are a decode error; out-of-range integers clamp:
/// `page` below 1 becomes 1, `pageSize` below 1 becomes the default, above
/// [`MAX_PAGE_SIZE`] clamps down.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Resolve to a store-level limit/offset window.
    ///
    /// Arithmetic saturates: an absurdly large `page` yields an offset past
    /// every record (an empty page), never a panic. `pageSize` clamps in
    /// i64 before narrowing so values beyond u32 still land on the max.
    pub fn to_page(&self) -> Page {
        let page = match self.page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };
        let size = match self.page_size {
            Some(s) if s >= 1 => s.min(MAX_PAGE_SIZE as i64) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        Page::new(size, (page - 1).saturating_mul(size as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, page_size: Option<i64>) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn defaults_are_first_page_of_ten() {
        let page = params(None, None).to_page();
        assert_eq!(page, Page::new(10, 0));
    }

    #[test]
    fn offset_follows_page_number() {
        assert_eq!(params(Some(1), Some(10)).to_page(), Page::new(10, 0));
        assert_eq!(params(Some(2), Some(10)).to_page(), Page::new(10, 10));
        assert_eq!(params(Some(3), Some(25)).to_page(), Page::new(25, 50));
    }

    #[test]
    fn page_zero_and_negatives_become_page_one() {
        assert_eq!(params(Some(0), None).to_page(), Page::new(10, 0));
        assert_eq!(params(Some(-7), None).to_page(), Page::new(10, 0));
    }

    #[test]
    fn oversized_page_size_clamps_to_max() {
        assert_eq!(params(None, Some(500)).to_page(), Page::new(100, 0));
        assert_eq!(params(Some(2), Some(500)).to_page(), Page::new(100, 100));
    }

    #[test]
    fn page_size_beyond_u32_range_still_clamps_to_max() {
        assert_eq!(params(None, Some(4_294_967_296)).to_page(), Page::new(100, 0));
        assert_eq!(params(None, Some(i64::MAX)).to_page(), Page::new(100, 0));
    }

    #[test]
    fn enormous_page_number_saturates_the_offset() {
        let page = params(Some(i64::MAX), Some(10)).to_page();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, u64::MAX);
    }

    #[test]
    fn non_positive_page_size_falls_back_to_default() {
        assert_eq!(params(None, Some(0)).to_page(), Page::new(10, 0));
        assert_eq!(params(None, Some(-3)).to_page(), Page::new(10, 0));
    }

    #[test]
    fn query_string_decodes_camel_case() {
        let params: PageParams =
            serde_urlencoded_like("page=2&pageSize=50").expect("should decode");
        assert_eq!(params.to_page(), Page::new(50, 50));
    }

    // Decode through serde_json to avoid a dev-dependency on serde_urlencoded;
    // the field names are what matter here.
    fn serde_urlencoded_like(qs: &str) -> Result<PageParams, serde_json::Error> {
        let mut map = serde_json::Map::new();
        for pair in qs.split('&') {
            if let Some((k, v)) = pair.split_once('=') {
                map.insert(
                    k.to_string(),
                    serde_json::Value::Number(v.parse::<i64>().unwrap().into()),
                );
            }
        }
        serde_json::from_value(serde_json::Value::Object(map))
    }
}

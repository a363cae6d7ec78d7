/// URL 相对部分拆解结果（站点 link 之后的部分）
/// path 不含 query/fragment；query 与 fragment 不含前导分隔符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlParts<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    pub fn new(path: &'a str, query: Option<&'a str>, fragment: Option<&'a str>) -> Self {
        Self { path, query, fragment }
    }

    /// 按首个 `#` 切出 fragment，再按首个 `?` 切出 query
    pub fn split(raw: &'a str) -> Self {
        let (before_fragment, fragment) = match raw.split_once('#') {
            Some((head, frag)) => (head, Some(frag)),
            None => (raw, None),
        };
        let (path, query) = match before_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (before_fragment, None),
        };
        Self { path, query, fragment }
    }

    /// 依次产出 query 与 fragment 中的 key=value 对（值已做 form-urlencoded 解码）
    /// 不含 `=` 的片段（如 `map=17/1/2` 之外的 `toner/12/...`）被忽略
    pub fn key_value_pairs(&self) -> impl Iterator<Item = (String, String)> + 'a {
        let query_pairs = self.query.into_iter().flat_map(parse_pairs);
        let fragment_pairs = self.fragment.into_iter().flat_map(parse_pairs);
        query_pairs.chain(fragment_pairs)
    }
}

fn parse_pairs(component: &str) -> impl Iterator<Item = (String, String)> + '_ {
    component
        .split('&')
        .filter(|pair| pair.contains('='))
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_all_components() {
        let parts = UrlParts::split("/way/263290462?locale=pt#map=17/-26.30144/-48.84531");
        assert_eq!(parts.path, "/way/263290462");
        assert_eq!(parts.query, Some("locale=pt"));
        assert_eq!(parts.fragment, Some("map=17/-26.30144/-48.84531"));
    }

    #[test]
    fn test_question_mark_inside_fragment_stays_in_fragment() {
        let parts = UrlParts::split("/#lat=1?x&lon=2");
        assert_eq!(parts.path, "/");
        assert_eq!(parts.query, None);
        assert_eq!(parts.fragment, Some("lat=1?x&lon=2"));
    }

    #[test]
    fn test_key_value_pairs_query_before_fragment() {
        let parts = UrlParts::split("/app?lat=1.5&z=3#lat=9&toner/1/2/3");
        let pairs: Vec<(String, String)> = parts.key_value_pairs().collect();
        assert_eq!(
            pairs,
            vec![
                ("lat".to_string(), "1.5".to_string()),
                ("z".to_string(), "3".to_string()),
                ("lat".to_string(), "9".to_string()),
            ]
        );
    }
}

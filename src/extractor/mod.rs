//! 页面提取模块
//! 页面快照 + 站点提取能力 + 兜底提取链
pub mod capability;
pub mod chain;
pub mod history_state;
pub mod html_extractor;
pub mod page;

pub use capability::{
    BingHistoryState, Extractors, ExtractorsSpec, LatLonText, PageStateCapability, PageStateSpec,
    PermalinkCapability, PermalinkSpec, SelectorPermalink, OPENLAYERS_PERMALINK_SELECTOR,
};
pub use chain::ExtractionChain;
pub use html_extractor::HtmlExtractor;
pub use page::PageSnapshot;

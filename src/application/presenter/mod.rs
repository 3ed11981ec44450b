//! Presentation state for the valuation form.
//!
//! View models are plain data; nothing here renders markup.

mod contact_dialog;
mod notice;
mod result_view;

pub use contact_dialog::{ContactDialog, ContactError};
pub use notice::{Notice, NoticeKind};
pub use result_view::{
    BuyerPersonaView, ConfidenceView, DetailSectionView, MarketActivityView, ResultView,
    SaleRecordView,
};

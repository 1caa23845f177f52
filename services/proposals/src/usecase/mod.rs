pub mod decision;
pub mod dispatch;
pub mod history;
pub mod preview;

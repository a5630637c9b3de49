//! Confluence API data types.

mod attachment;
mod page;

pub use attachment::{Attachment, AttachmentsResponse, Label, LabelsResponse, User};
pub use page::{Body, Links, Page, PageDraft, PublishedPage, SearchResponse, Storage, Version};

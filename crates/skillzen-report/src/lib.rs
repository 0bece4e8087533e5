//! skillzen-report — Renderings of session reports.

pub mod html;
pub mod markdown;

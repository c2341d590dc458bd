//! Report pipeline pieces: template selection, prompt assembly,
//! best-effort financial-data extraction and HTML rendering.
//!
//! Everything here is synchronous string work except extraction, which
//! makes one model call through [`finsight_llm::ChatClient`].

pub mod extract;
pub mod prompt;
pub mod render;
pub mod template;

pub use extract::{parse_financial_json, ExtractError, FinancialDataExtractor};
pub use prompt::{conversation_text, section_guidance, ReportPrompt, CONTEXT_CHAR_LIMIT};
pub use render::{
    financial::{render_financial, render_financial_section, FinancialView, RenderError},
    markdown::markdown_to_html,
    page::{render_not_found_page, render_report_page},
    sections::{render_sections, split_sections, Section, SECTION_COLORS},
};
pub use template::select_template;

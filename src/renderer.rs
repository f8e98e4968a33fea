use crate::controller::PreviewState;
use crate::utils::truncate_str;
use crate::PreviewResult;
use std::fmt;

/// Shown for any field the preview does not have.
pub const PLACEHOLDER: &str = "—";

const PAGE_TITLE: &str = "Generate Link Screenshot";
const PAGE_SUBTITLE: &str = "Paste any URL to generate a live website screenshot.";
const GENERATE_LABEL: &str = "Generate";
const BUSY_LABEL: &str = "Generating…";
const NO_SCREENSHOT: &str = "No screenshot available";
const CARD_WIDTH: usize = 60;
const CARD_DESCRIPTION_WIDTH: usize = CARD_WIDTH - 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    WhatsApp,
    Twitter,
    Discord,
    Facebook,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::WhatsApp,
        Platform::Twitter,
        Platform::Discord,
        Platform::Facebook,
        Platform::LinkedIn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Platform::WhatsApp => "WhatsApp",
            Platform::Twitter => "Twitter / X",
            Platform::Discord => "Discord",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateControl {
    pub label: &'static str,
    pub busy: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPanel {
    pub url: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub keywords: String,
    pub og_image: String,
}

impl MetadataPanel {
    pub fn new(result: &PreviewResult) -> Self {
        let keywords = if result.keywords.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            result.keywords.join(", ")
        };

        Self {
            url: or_placeholder(Some(result.source_url.as_str())),
            title: or_placeholder(result.title.as_deref()),
            description: or_placeholder(result.description.as_deref()),
            domain: or_placeholder(Some(result.domain.as_str())),
            keywords,
            og_image: or_placeholder(result.og_image.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotPanel {
    /// Image source, or `None` when the preview has no screenshot.
    pub src: Option<String>,
}

/// A mocked link card. Every platform shows the same content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialCard {
    pub platform: Platform,
    pub image: Option<String>,
    pub domain: String,
    pub title: String,
    pub description: String,
}

impl SocialCard {
    pub fn new(platform: Platform, result: &PreviewResult) -> Self {
        let image = result
            .og_image
            .clone()
            .or_else(|| result.screenshot.as_ref().map(|s| s.src().to_string()));

        Self {
            platform,
            image,
            domain: or_placeholder(Some(result.domain.as_str())),
            title: or_placeholder(result.title.as_deref()),
            description: or_placeholder(result.description.as_deref()),
        }
    }
}

/// Everything the page shows for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub control: GenerateControl,
    pub notice: Option<String>,
    pub metadata: Option<MetadataPanel>,
    pub screenshot: Option<ScreenshotPanel>,
    pub cards: Vec<SocialCard>,
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn render(state: &PreviewState) -> Page {
    let control = GenerateControl {
        label: if state.is_loading {
            BUSY_LABEL
        } else {
            GENERATE_LABEL
        },
        busy: state.is_loading,
        disabled: state.is_loading,
    };

    let Some(result) = state.result.as_ref() else {
        return Page {
            control,
            notice: state.error_message.clone(),
            metadata: None,
            screenshot: None,
            cards: Vec::new(),
        };
    };

    Page {
        control,
        notice: state.error_message.clone(),
        metadata: Some(MetadataPanel::new(result)),
        screenshot: Some(ScreenshotPanel {
            src: result.screenshot.as_ref().map(|s| s.src().to_string()),
        }),
        cards: Platform::ALL
            .iter()
            .map(|&platform| SocialCard::new(platform, result))
            .collect(),
    }
}

impl fmt::Display for SocialCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "─".repeat(CARD_WIDTH - 2);
        writeln!(f, "┌{rule}┐")?;
        writeln!(f, "  {}", self.platform.label())?;
        if let Some(image) = &self.image {
            writeln!(f, "  [image] {}", truncate_str(image, CARD_DESCRIPTION_WIDTH - 8))?;
        }
        writeln!(f, "  {}", self.domain.to_uppercase())?;
        writeln!(f, "  {}", truncate_str(&self.title, CARD_DESCRIPTION_WIDTH))?;
        writeln!(f, "  {}", truncate_str(&self.description, CARD_DESCRIPTION_WIDTH))?;
        write!(f, "└{rule}┘")
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{PAGE_TITLE}")?;
        writeln!(f, "{PAGE_SUBTITLE}")?;
        writeln!(f)?;

        if self.control.busy {
            writeln!(f, "[ {} ] (disabled)", self.control.label)?;
        } else {
            writeln!(f, "[ {} ]", self.control.label)?;
        }

        if let Some(notice) = &self.notice {
            writeln!(f)?;
            writeln!(f, "! {notice}")?;
        }

        if let Some(metadata) = &self.metadata {
            writeln!(f)?;
            writeln!(f, "Link Information")?;
            writeln!(f, "  URL:         {}", metadata.url)?;
            writeln!(f, "  Title:       {}", metadata.title)?;
            writeln!(f, "  Description: {}", metadata.description)?;
            writeln!(f, "  Domain:      {}", metadata.domain)?;
            writeln!(f, "  Keywords:    {}", metadata.keywords)?;
            writeln!(f, "  OG Image:    {}", metadata.og_image)?;
        }

        if let Some(screenshot) = &self.screenshot {
            writeln!(f)?;
            writeln!(f, "Website Screenshot")?;
            match &screenshot.src {
                Some(src) => writeln!(f, "  {src}")?,
                None => writeln!(f, "  {NO_SCREENSHOT}")?,
            }
        }

        for card in &self.cards {
            writeln!(f)?;
            writeln!(f, "{card}")?;
        }

        Ok(())
    }
}

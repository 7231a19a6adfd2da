//! Locale handling for the bilingual site.
//!
//! Every public path starts with a locale code, and several route segments
//! are translated: `/id/wawasan/..` is the Indonesian twin of `/en/insights/..`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported site locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Indonesian (default)
    #[default]
    Id,
    /// English
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Id, Locale::En];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
        }
    }

    /// Parse a locale code; anything but `id`/`en` is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "id" => Some(Self::Id),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Parse a locale code, falling back to Indonesian.
    pub fn or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// `og:locale` style tag.
    pub const fn territory(self) -> &'static str {
        match self {
            Self::Id => "id_ID",
            Self::En => "en_US",
        }
    }

    /// Slug of the CMS page that acts as the locale's home page.
    pub const fn home_slug(self) -> &'static str {
        match self {
            Self::Id => "beranda",
            Self::En => "home",
        }
    }

    pub const fn insights_segment(self) -> &'static str {
        match self {
            Self::Id => "wawasan",
            Self::En => "insights",
        }
    }

    pub const fn works_segment(self) -> &'static str {
        match self {
            Self::Id => "karya",
            Self::En => "work",
        }
    }

    pub const fn services_segment(self) -> &'static str {
        match self {
            Self::Id => "layanan",
            Self::En => "services",
        }
    }

    pub const fn strings(self) -> &'static Strings {
        match self {
            Self::Id => &ID_STRINGS,
            Self::En => &EN_STRINGS,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// UI Strings
// ============================================================================

/// Fixed interface copy rendered outside CMS-managed content.
#[derive(Debug)]
pub struct Strings {
    pub back_to_insights: &'static str,
    pub by: &'static str,
    pub read_time: &'static str,
    pub cta_title: &'static str,
    pub cta_description: &'static str,
    pub cta_button: &'static str,
    pub copyright: &'static str,
    pub content_unavailable: &'static str,
    pub page_not_found: &'static str,
    pub lets_talk: &'static str,
    pub learn_more: &'static str,
    pub contact_path: &'static str,
    pub rfp_success: &'static str,
    pub home: &'static str,
    pub insights: &'static str,
    pub back_to_home: &'static str,
    pub objective: &'static str,
    pub budget: &'static str,
    pub channels: &'static str,
    pub not_specified: &'static str,
    pub project_details: &'static str,
    pub details_unavailable: &'static str,
    pub months: [&'static str; 12],
}

static ID_STRINGS: Strings = Strings {
    back_to_insights: "Kembali ke Wawasan",
    by: "Oleh",
    read_time: "menit baca",
    cta_title: "Tertarik bekerja sama?",
    cta_description: "Mari diskusikan bagaimana CAVOTA dapat membantu bisnis Anda berkembang.",
    cta_button: "Hubungi Kami",
    copyright: "© 2025 CAVOTA. Semua hak dilindungi.",
    content_unavailable: "Konten tidak tersedia",
    page_not_found: "Halaman tidak ditemukan",
    lets_talk: "Mari Bicara",
    learn_more: "Pelajari Lebih Lanjut",
    contact_path: "/id/kontak",
    rfp_success: "Pesan Anda telah berhasil dikirim. Tim kami akan menghubungi Anda segera.",
    home: "Beranda",
    insights: "Wawasan",
    back_to_home: "Kembali ke Beranda",
    objective: "Objektif",
    budget: "Anggaran",
    channels: "Saluran",
    not_specified: "Tidak disebutkan",
    project_details: "Detail Proyek",
    details_unavailable: "Detail tidak tersedia.",
    months: [
        "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
        "Oktober", "November", "Desember",
    ],
};

static EN_STRINGS: Strings = Strings {
    back_to_insights: "Back to Insights",
    by: "By",
    read_time: "min read",
    cta_title: "Interested in working together?",
    cta_description: "Let's discuss how CAVOTA can help your business grow.",
    cta_button: "Contact Us",
    copyright: "© 2025 CAVOTA. All rights reserved.",
    content_unavailable: "Content not available",
    page_not_found: "Page not found",
    lets_talk: "Let's Talk",
    learn_more: "Learn More",
    contact_path: "/en/contact",
    rfp_success: "Your message has been successfully sent. Our team will contact you shortly.",
    home: "Home",
    insights: "Insights",
    back_to_home: "Back to Home",
    objective: "Objective",
    budget: "Budget",
    channels: "Channels",
    not_specified: "Not specified",
    project_details: "Project Details",
    details_unavailable: "Details not available.",
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
};

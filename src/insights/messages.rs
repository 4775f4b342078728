//! User-facing strings.

/// Language for messages shown to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Spanish.
    #[default]
    Es,
    /// English.
    En,
}

/// Which analysis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// Keyword metrics.
    Keywords,
    /// SERP results.
    Serp,
    /// Domain rankings.
    Domain,
    /// Competitors.
    Competitors,
    /// Keyword suggestions.
    Suggestions,
    /// Trends.
    Trends,
}

impl Locale {
    /// Message replacing the error of a failed analysis.
    pub fn analysis_error(&self, analysis: Analysis) -> &'static str {
        match (self, analysis) {
            (Locale::Es, Analysis::Keywords) => "Error analizando keywords",
            (Locale::Es, Analysis::Serp) => "Error analizando SERP",
            (Locale::Es, Analysis::Domain) => "Error analizando dominio",
            (Locale::Es, Analysis::Competitors) => "Error analizando competencia",
            (Locale::Es, Analysis::Suggestions) => "Error obteniendo sugerencias",
            (Locale::Es, Analysis::Trends) => "Error analizando tendencias",
            (Locale::En, Analysis::Keywords) => "Error analyzing keywords",
            (Locale::En, Analysis::Serp) => "Error analyzing SERP",
            (Locale::En, Analysis::Domain) => "Error analyzing domain",
            (Locale::En, Analysis::Competitors) => "Error analyzing competitors",
            (Locale::En, Analysis::Suggestions) => "Error getting keyword suggestions",
            (Locale::En, Analysis::Trends) => "Error analyzing trends",
        }
    }

    /// Header placed before live data appended to a prompt.
    pub fn live_data_header(&self) -> &'static str {
        match self {
            Locale::Es => "[DATOS DE SEO EN TIEMPO REAL]",
            Locale::En => "[LIVE SEO DATA]",
        }
    }

    /// Reply sent when text generation fails.
    pub fn apology(&self) -> &'static str {
        match self {
            Locale::Es => {
                "Lo siento, hubo un error procesando tu mensaje. Por favor, inténtalo de nuevo."
            }
            Locale::En => "Sorry, there was an error processing your message. Please try again.",
        }
    }

    /// Message for an empty chat message.
    pub fn message_required(&self) -> &'static str {
        match self {
            Locale::Es => "Mensaje requerido",
            Locale::En => "Message is required",
        }
    }
}

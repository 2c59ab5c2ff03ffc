//! Search result models.
//!
//! Both result kinds carry a stable identifier computed once, when the value
//! is built or decoded. Equality and hashing look at that identifier only;
//! payload fields may differ between two values that denote the same entity.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Capability shared by everything a controller can page through.
pub trait SearchItem: Clone + Send + Sync + 'static {
    /// Stable identifier; the sole basis of de-duplication.
    fn id(&self) -> &str;
}

/// Fields of the last-resort composite identifier, `source|company|title|location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeKey<'a> {
    pub source: Option<&'a str>,
    pub company: Option<&'a str>,
    pub title: Option<&'a str>,
    pub location: Option<&'a str>,
}

impl CompositeKey<'_> {
    /// Render the key. Missing parts become empty segments.
    pub fn render(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.source.unwrap_or(""),
            self.company.unwrap_or(""),
            self.title.unwrap_or(""),
            self.location.unwrap_or("")
        )
    }
}

/// Pick the first non-blank candidate, falling back to the composite key.
///
/// Candidates are tried in order (explicit id, record id, canonical URL).
pub fn derive_identifier(candidates: &[Option<&str>], fallback: CompositeKey<'_>) -> String {
    candidates
        .iter()
        .flatten()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.render())
}

// ═══════════════════════════════════════════════════════════════════════
// Job postings
// ═══════════════════════════════════════════════════════════════════════

/// Pay range attached to a posting. All parts are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub currency: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub period: Option<String>,
    pub notes: Option<String>,
}

impl Compensation {
    /// Compact human form, e.g. `"USD 120000-150000/year"`. `None` when no bounds are known.
    pub fn summary(&self) -> Option<String> {
        let range = match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo == hi => format!("{}", lo),
            (Some(lo), Some(hi)) => format!("{}-{}", lo, hi),
            (Some(lo), None) => format!("{}+", lo),
            (None, Some(hi)) => format!("up to {}", hi),
            (None, None) => return None,
        };
        let mut out = match &self.currency {
            Some(cur) if !cur.is_empty() => format!("{} {}", cur, range),
            _ => range,
        };
        if let Some(period) = self.period.as_deref().filter(|p| !p.is_empty()) {
            out.push('/');
            out.push_str(period);
        }
        Some(out)
    }
}

/// Decoded shape of a posting before its identifier is fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingFields {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub compensation: Compensation,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub description_snippet: Option<String>,
}

/// One job posting returned by `/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "JobPostingFields")]
pub struct JobPosting {
    #[serde(skip)]
    identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: Option<String>,
    pub company: Option<String>,
    pub title: String,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub tech_stack: Vec<String>,
    pub compensation: Compensation,
    pub url: Option<String>,
    pub job_id: Option<String>,
    pub description_snippet: Option<String>,
}

impl From<JobPostingFields> for JobPosting {
    fn from(f: JobPostingFields) -> Self {
        let identifier = derive_identifier(
            &[f.id.as_deref(), f.job_id.as_deref(), f.url.as_deref()],
            CompositeKey {
                source: f.source.as_deref(),
                company: f.company.as_deref(),
                title: Some(&f.title),
                location: f.location.as_deref(),
            },
        );
        Self {
            identifier,
            id: f.id,
            source: f.source,
            company: f.company,
            title: f.title,
            location: f.location,
            remote: f.remote,
            tech_stack: f.tech_stack,
            compensation: f.compensation,
            url: f.url,
            job_id: f.job_id,
            description_snippet: f.description_snippet,
        }
    }
}

impl SearchItem for JobPosting {
    fn id(&self) -> &str {
        &self.identifier
    }
}

impl PartialEq for JobPosting {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for JobPosting {}

impl Hash for JobPosting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Job insights
// ═══════════════════════════════════════════════════════════════════════

/// A skill called out in an insight report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub proficiency_level: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Decoded shape of an insight report before its identifier is fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInsightFields {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub insight_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, alias = "title")]
    pub position: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// One insight report returned by `/job-insights`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "JobInsightFields")]
pub struct JobInsight {
    #[serde(skip)]
    identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub insight_id: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
    pub feedback: Option<String>,
}

impl From<JobInsightFields> for JobInsight {
    fn from(f: JobInsightFields) -> Self {
        let identifier = derive_identifier(
            &[f.id.as_deref(), f.insight_id.as_deref(), f.url.as_deref()],
            CompositeKey {
                source: f.source.as_deref(),
                company: f.company.as_deref(),
                title: f.position.as_deref(),
                location: f.location.as_deref(),
            },
        );
        Self {
            identifier,
            id: f.id,
            insight_id: f.insight_id,
            url: f.url,
            source: f.source,
            company: f.company,
            position: f.position,
            location: f.location,
            summary: f.summary,
            skills: f.skills,
            feedback: f.feedback,
        }
    }
}

impl SearchItem for JobInsight {
    fn id(&self) -> &str {
        &self.identifier
    }
}

impl PartialEq for JobInsight {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for JobInsight {}

impl Hash for JobInsight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

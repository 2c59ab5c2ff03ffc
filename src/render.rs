//! Terminal output for search results and saved lists.

use anyhow::Result;
use job_searcher_core::{JobInsight, JobPosting, SearchItem};
use serde::Serialize;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

/// Human-readable summary of an item.
pub trait Listing: SearchItem + Serialize {
    fn headline(&self) -> String;

    /// Indented lines printed under the headline; blank parts are skipped.
    fn details(&self) -> Vec<String>;
}

fn at_company(title: &str, company: Option<&str>) -> String {
    match company.filter(|c| !c.trim().is_empty()) {
        Some(company) => format!("{} @ {}", title, company),
        None => title.to_string(),
    }
}

impl Listing for JobPosting {
    fn headline(&self) -> String {
        let title = if self.title.trim().is_empty() {
            "(untitled)"
        } else {
            self.title.as_str()
        };
        at_company(title, self.company.as_deref())
    }

    fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match (self.location.as_deref(), self.remote) {
            (Some(loc), Some(true)) => lines.push(format!("location: {} (remote)", loc)),
            (Some(loc), _) => lines.push(format!("location: {}", loc)),
            (None, Some(true)) => lines.push("location: remote".to_string()),
            (None, _) => {}
        }
        if let Some(pay) = self.compensation.summary() {
            lines.push(format!("pay: {}", pay));
        }
        if !self.tech_stack.is_empty() {
            lines.push(format!("stack: {}", self.tech_stack.join(", ")));
        }
        if let Some(snippet) = self.description_snippet.as_deref() {
            lines.push(format!("excerpt: \"{}\"", snippet.replace('\n', " ").trim()));
        }
        if let Some(url) = self.url.as_deref() {
            lines.push(format!("url: {}", url));
        }
        lines.push(format!("id: {}", self.id()));
        lines
    }
}

impl Listing for JobInsight {
    fn headline(&self) -> String {
        let position = self
            .position
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or("(unspecified position)");
        at_company(position, self.company.as_deref())
    }

    fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(loc) = self.location.as_deref() {
            lines.push(format!("location: {}", loc));
        }
        if let Some(summary) = self.summary.as_deref() {
            lines.push(format!("summary: {}", summary.replace('\n', " ").trim()));
        }
        if !self.skills.is_empty() {
            let skills: Vec<String> = self
                .skills
                .iter()
                .map(|s| {
                    if s.proficiency_level.is_empty() {
                        s.name.clone()
                    } else {
                        format!("{} ({})", s.name, s.proficiency_level)
                    }
                })
                .collect();
            lines.push(format!("skills: {}", skills.join(", ")));
        }
        if let Some(feedback) = self.feedback.as_deref() {
            lines.push(format!("feedback: {}", feedback.replace('\n', " ").trim()));
        }
        lines.push(format!("id: {}", self.id()));
        lines
    }
}

/// Numbered plain-text listing, one blank line between items.
pub fn render_plain<I: Listing>(items: &[I]) -> String {
    if items.is_empty() {
        return "No results.\n".to_string();
    }
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item.headline()));
        for line in item.details() {
            out.push_str("    ");
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn render<I: Listing>(items: &[I], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(render_plain(items)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(items)?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub fn print_items<I: Listing>(items: &[I], format: OutputFormat) -> Result<()> {
    print!("{}", render(items, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_searcher_core::models::{JobInsightFields, JobPostingFields};
    use job_searcher_core::{Compensation, Skill};

    #[test]
    fn test_job_listing() {
        let job = JobPosting::from(JobPostingFields {
            job_id: Some("j-9".into()),
            title: "Backend Engineer".into(),
            company: Some("Acme".into()),
            location: Some("Austin, TX".into()),
            remote: Some(true),
            tech_stack: vec!["rust".into(), "postgres".into()],
            compensation: Compensation {
                currency: Some("USD".into()),
                min: Some(150000.0),
                max: Some(190000.0),
                period: Some("year".into()),
                notes: None,
            },
            ..Default::default()
        });
        assert_eq!(job.headline(), "Backend Engineer @ Acme");
        assert_eq!(
            job.details(),
            [
                "location: Austin, TX (remote)",
                "pay: USD 150000-190000/year",
                "stack: rust, postgres",
                "id: j-9",
            ]
        );
    }

    #[test]
    fn test_insight_listing() {
        let insight = JobInsight::from(JobInsightFields {
            insight_id: Some("i-1".into()),
            position: Some("Data Analyst".into()),
            skills: vec![
                Skill {
                    name: "SQL".into(),
                    proficiency_level: "advanced".into(),
                    category: None,
                },
                Skill {
                    name: "Excel".into(),
                    proficiency_level: String::new(),
                    category: None,
                },
            ],
            ..Default::default()
        });
        assert_eq!(insight.headline(), "Data Analyst");
        assert_eq!(insight.details(), ["skills: SQL (advanced), Excel", "id: i-1"]);
    }

    #[test]
    fn test_empty_listing() {
        let items: Vec<JobPosting> = Vec::new();
        assert_eq!(render_plain(&items), "No results.\n");
        assert_eq!(render(&items, OutputFormat::Json).unwrap(), "[]\n");
    }

    #[test]
    fn test_plain_listing_is_numbered() {
        let items: Vec<JobPosting> = ["a", "b"]
            .iter()
            .map(|id| {
                JobPosting::from(JobPostingFields {
                    job_id: Some(id.to_string()),
                    title: format!("Job {}", id),
                    ..Default::default()
                })
            })
            .collect();
        let out = render_plain(&items);
        assert!(out.starts_with("1. Job a\n    id: a\n\n2. Job b\n"));
    }
}

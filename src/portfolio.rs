//! The public portfolio surface: read-mostly views of the same collaborator
//! API, plus the unauthenticated contact-message submission path.
//!
//! All five lists load concurrently. A failed fetch degrades to a single
//! banner while whatever did load still renders.

use std::collections::BTreeMap;

use reqwest::Method;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::models::{ContactMessagePayload, Experience, Profile, Project, Skill, Technology};

pub const LOAD_FAILURE_BANNER: &str = "Unable to load portfolio data. Please try again later.";
pub const MESSAGE_SUCCESS: &str = "Message sent successfully.";
pub const MESSAGE_FAILURE: &str = "Unable to send message. Please try again.";

/// Everything the public page shows, assembled from five list fetches.
#[derive(Debug, Default)]
pub struct PortfolioView {
    pub profile: Option<Profile>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub technologies: Vec<Technology>,
    /// At least one fetch failed; render the banner over partial data.
    pub load_failed: bool,
}

pub async fn load(client: &ApiClient) -> PortfolioView {
    let (profiles, projects, skills, experience, technologies) = tokio::join!(
        client.fetch_list::<Profile>("profile"),
        client.fetch_list::<Project>("projects"),
        client.fetch_list::<Skill>("skills"),
        client.fetch_list::<Experience>("experience"),
        client.fetch_list::<Technology>("technologies"),
    );

    let mut load_failed = false;
    let profiles = unwrap_or_mark(profiles, &mut load_failed);
    PortfolioView {
        profile: profiles.into_iter().next(),
        projects: unwrap_or_mark(projects, &mut load_failed),
        skills: unwrap_or_mark(skills, &mut load_failed),
        experience: unwrap_or_mark(experience, &mut load_failed),
        technologies: unwrap_or_mark(technologies, &mut load_failed),
        load_failed,
    }
}

fn unwrap_or_mark<T>(result: Result<Vec<T>, ApiError>, failed: &mut bool) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            log::warn!("portfolio fetch failed: {e}");
            *failed = true;
            Vec::new()
        }
    }
}

/// Submit a contact message. Unauthenticated by design; `is_read` posts as
/// false so the admin inbox picks it up as new.
pub async fn send_message(
    client: &ApiClient,
    payload: &ContactMessagePayload,
) -> Result<(), ApiError> {
    let body = serde_json::to_value(payload)?;
    client
        .send(ApiRequest::json(Method::POST, "messages/", body))
        .await
        .map(|_| ())
}

/// Skills grouped by category, blank categories under "Other". BTreeMap so
/// rendering order is stable.
pub fn group_skills(skills: &[Skill]) -> BTreeMap<String, Vec<&Skill>> {
    let mut grouped: BTreeMap<String, Vec<&Skill>> = BTreeMap::new();
    for skill in skills {
        let key = if skill.category.trim().is_empty() {
            "Other".to_string()
        } else {
            skill.category.clone()
        };
        grouped.entry(key).or_default().push(skill);
    }
    grouped
}

/// Technology names for a project, resolved through the technologies list.
/// Unknown ids render as the raw id rather than disappearing.
pub fn technology_names(project: &Project, technologies: &[Technology]) -> Vec<String> {
    project
        .technologies
        .iter()
        .map(|id| {
            technologies
                .iter()
                .find(|tech| tech.id == *id)
                .map(|tech| tech.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect()
}

/// Render the whole page as terminal text.
pub fn render(view: &PortfolioView) -> String {
    let mut out = String::new();

    if view.load_failed {
        out.push_str(LOAD_FAILURE_BANNER);
        out.push_str("\n\n");
    }

    if let Some(profile) = &view.profile {
        out.push_str(&format!("# {}\n", profile.full_name));
        if !profile.location.is_empty() {
            out.push_str(&format!("{}\n", profile.location));
        }
        if !profile.bio_summary.is_empty() {
            out.push_str(&format!("\n{}\n", profile.bio_summary));
        }
        if let Some(photo) = profile.photo() {
            out.push_str(&format!("Photo: {photo}\n"));
        }
        if !profile.resume_link.is_empty() {
            out.push_str(&format!("Resume: {}\n", profile.resume_link));
        }
        out.push('\n');
    }

    if !view.projects.is_empty() {
        out.push_str("## Projects\n");
        for project in &view.projects {
            out.push_str(&format!("- {}\n", project.title));
            if !project.description.is_empty() {
                out.push_str(&format!("  {}\n", project.description));
            }
            let techs = technology_names(project, &view.technologies);
            if !techs.is_empty() {
                out.push_str(&format!("  Tech: {}\n", techs.join(", ")));
            }
            if !project.live_link.is_empty() {
                out.push_str(&format!("  Live: {}\n", project.live_link));
            }
            if !project.github_link.is_empty() {
                out.push_str(&format!("  Code: {}\n", project.github_link));
            }
        }
        out.push('\n');
    }

    if !view.skills.is_empty() {
        out.push_str("## Skills\n");
        for (category, skills) in group_skills(&view.skills) {
            out.push_str(&format!("{category}:\n"));
            for skill in skills {
                out.push_str(&format!("  - {} ({})", skill.name, skill.proficiency_label()));
                if let Some(cert) = skill.certification_url.as_deref().filter(|c| !c.is_empty()) {
                    out.push_str(&format!(" [{cert}]"));
                }
                out.push('\n');
            }
        }
        out.push('\n');
    }

    if !view.experience.is_empty() {
        out.push_str("## Experience\n");
        for role in &view.experience {
            out.push_str(&format!(
                "- {} at {} ({})\n",
                role.job_title,
                role.company_name,
                role.date_range()
            ));
            if !role.responsibilities.is_empty() {
                out.push_str(&format!("  {}\n", role.responsibilities));
            }
        }
        out.push('\n');
    }

    if !view.technologies.is_empty() {
        out.push_str("## Tech\n");
        let names: Vec<&str> = view.technologies.iter().map(|t| t.name.as_str()).collect();
        out.push_str(&format!("{}\n", names.join(", ")));
    }

    if out.is_empty() {
        out.push_str("Nothing to show yet.\n");
    }
    out
}

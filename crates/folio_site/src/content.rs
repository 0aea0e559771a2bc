//! Content catalogue
//!
//! Only the fields the controllers act on are kept: names, categories and
//! asset paths. Long-form copy lives with the presentation layer.

use std::fmt;
use std::str::FromStr;

use folio_controllers::Categorized;
use serde::{Deserialize, Serialize};

// =============================================================================
// Portfolio
// =============================================================================

/// Portfolio project category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "full-stack")]
    FullStack,
    #[serde(rename = "frontend")]
    Frontend,
    #[serde(rename = "backend")]
    Backend,
    #[serde(rename = "AI")]
    Ai,
}

impl ProjectCategory {
    /// Categories offered as filter tabs, after "all"
    pub const TABS: [ProjectCategory; 3] = [
        ProjectCategory::FullStack,
        ProjectCategory::Frontend,
        ProjectCategory::Backend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::FullStack => "full-stack",
            ProjectCategory::Frontend => "frontend",
            ProjectCategory::Backend => "backend",
            ProjectCategory::Ai => "AI",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-stack" => Ok(ProjectCategory::FullStack),
            "frontend" => Ok(ProjectCategory::Frontend),
            "backend" => Ok(ProjectCategory::Backend),
            "AI" | "ai" => Ok(ProjectCategory::Ai),
            other => Err(format!("unknown project category {other:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub image: String,
    pub categories: Vec<ProjectCategory>,
    pub technologies: Vec<String>,
}

impl Project {
    fn new(
        title: &str,
        image: &str,
        categories: &[ProjectCategory],
        technologies: &[&str],
    ) -> Self {
        Self {
            title: title.to_string(),
            image: image.to_string(),
            categories: categories.to_vec(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Categorized<ProjectCategory> for Project {
    fn categories(&self) -> &[ProjectCategory] {
        &self.categories
    }
}

pub fn projects() -> Vec<Project> {
    use ProjectCategory::*;

    vec![
        Project::new(
            "Portfolio Website",
            "/portfolio website.PNG",
            &[Frontend],
            &["React", "TypeScript", "Tailwind CSS", "Framer Motion", "React-Scroll"],
        ),
        Project::new(
            "Annotation Tool (ANNA)",
            "anna.png",
            &[FullStack, Ai, Frontend, Backend],
            &["React", "TypeScript", "Tailwind CSS", "Chart.js", "Fabric.js", "FastAPI", "Express.js", "MongoDB", "YOLOv8/v9/v11", "FRCNN", "Mask R-CNN"],
        ),
        Project::new(
            "Chatley.AI",
            "chatley ai project.PNG",
            &[FullStack, Backend, Frontend, Ai],
            &["React", "JavaScript", "Node.js", "Express", "MongoDB", "JWT", "VAPI.ai"],
        ),
        Project::new(
            "Jameel Akhtar Projects SPC",
            "jameelaktharprojects.png",
            &[Frontend, Backend],
            &["React", "Tailwind CSS", "Node.js", "Express.js", "MongoDB", "JWT", "google-map-react", "EmailJS"],
        ),
        Project::new(
            "Travel Website",
            "travel website.PNG",
            &[Frontend],
            &["React", "JavaScript", "Tailwind CSS", "React Icons", "Styled Components"],
        ),
        Project::new(
            "Dash 180",
            "dash 180.PNG",
            &[Frontend],
            &["React", "EmailJS", "Tailwind CSS", "TypeScript"],
        ),
    ]
}

// =============================================================================
// Technologies
// =============================================================================

/// Skill group shown as a tab in the technologies section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechGroup {
    Frontend,
    Backend,
    Database,
}

impl TechGroup {
    pub const ALL: [TechGroup; 3] = [TechGroup::Frontend, TechGroup::Backend, TechGroup::Database];

    pub fn as_str(&self) -> &'static str {
        match self {
            TechGroup::Frontend => "Frontend",
            TechGroup::Backend => "Backend",
            TechGroup::Database => "Database",
        }
    }
}

impl fmt::Display for TechGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TechGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown technology group {s:?}"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub group: TechGroup,
    /// Percent, drives the proficiency bar
    pub proficiency: u8,
}

impl Categorized<TechGroup> for Technology {
    fn categories(&self) -> &[TechGroup] {
        std::slice::from_ref(&self.group)
    }
}

/// Every technology in "All" tab order
///
/// HTML5, CSS3 and JavaScript lead; the rest keep their group order.
pub fn technologies() -> Vec<Technology> {
    use TechGroup::*;

    const LEADING: [&str; 3] = ["HTML5", "CSS3", "JavaScript"];
    let grouped = [
        ("React", Frontend, 95),
        ("TypeScript", Frontend, 70),
        ("JavaScript", Frontend, 95),
        ("Tailwind CSS", Frontend, 90),
        ("Next.js", Frontend, 85),
        ("HTML5", Frontend, 95),
        ("CSS3", Frontend, 90),
        ("Redux", Frontend, 85),
        ("Node.js", Backend, 90),
        ("Express.js", Backend, 90),
        ("REST API", Backend, 85),
        ("GraphQL", Backend, 80),
        ("MongoDB", Database, 90),
        ("PostgreSQL", Database, 85),
        ("MySQL", Database, 80),
    ]
    .map(|(name, group, proficiency)| Technology {
        name: name.to_string(),
        group,
        proficiency,
    });

    let (mut leading, rest): (Vec<_>, Vec<_>) = grouped
        .into_iter()
        .partition(|tech| LEADING.contains(&tech.name.as_str()));
    leading.sort_by_key(|tech| LEADING.iter().position(|name| *name == tech.name));
    leading.extend(rest);
    leading
}

// =============================================================================
// Services and testimonials
// =============================================================================

pub fn services() -> Vec<&'static str> {
    vec![
        "Frontend Development",
        "Backend Development",
        "Responsive Design",
        "Full-Stack Solutions",
        "API Integration",
        "Code Optimization",
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub company: String,
    pub image: String,
}

pub fn testimonials() -> Vec<Testimonial> {
    [
        ("Sarah Johnson", "Product Manager", "TechCorp Inc.", "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg"),
        ("Michael Rodriguez", "CTO", "StartUp Innovations", "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg"),
        ("Emily Chen", "CEO", "DesignHub", "https://images.pexels.com/photos/3771807/pexels-photo-3771807.jpeg"),
        ("David Williams", "Marketing Director", "Global Solutions", "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg"),
    ]
    .into_iter()
    .map(|(name, role, company, image)| Testimonial {
        name: name.to_string(),
        role: role.to_string(),
        company: company.to_string(),
        image: image.to_string(),
    })
    .collect()
}

/// Downloadable CV linked from the hero
pub const RESUME_PATH: &str = "/Tahir Mehmood Cv.pdf";

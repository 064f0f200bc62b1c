//! The module contains saved projects. A project is a named list of catalog
//! part ids with quantities; prices stay in the catalog and are resolved
//! when a budget is computed.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Quantity, ResultEngine, error::EngineError};

/// One line of a project: a part reference and how much of it is used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub part_id: String,
    pub quantity: Quantity,
}

impl ProjectItem {
    pub fn new(part_id: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
        }
    }
}

/// A piece of furniture the workshop has quoted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Blurb shown with the project; absent in older store files.
    #[serde(default)]
    pub description: String,
    pub items: Vec<ProjectItem>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Builds a project ready to be saved.
    ///
    /// Quantities below [`Quantity::MIN`] are raised to it here, at the
    /// moment the lines are committed. Whatever ends up in a store file by
    /// other means is used as-is.
    pub fn new(name: String, description: String, items: Vec<ProjectItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| ProjectItem {
                quantity: item.quantity.clamp_min(),
                ..item
            })
            .collect();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            items,
            created_at: Utc::now(),
        }
    }
}

/// The workshop's saved projects, in the order they were created.
#[derive(Debug, Default, PartialEq)]
pub struct Projects {
    projects: Vec<Project>,
}

impl Projects {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Reads the saved projects from `path`. A missing file is an empty
    /// store, not an error.
    pub fn load(path: &Path) -> ResultEngine<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let projects: Vec<Project> = serde_json::from_str(&raw)?;
        Ok(Self { projects })
    }

    /// Writes the whole store to `path`, creating parent directories on
    /// first save.
    pub fn save(&self, path: &Path) -> ResultEngine<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.projects)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn add(&mut self, project: Project) -> ResultEngine<()> {
        if self.projects.iter().any(|existing| existing.id == project.id) {
            return Err(EngineError::ExistingKey(project.id));
        }
        self.projects.push(project);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> ResultEngine<Project> {
        match self.projects.iter().position(|project| project.id == id) {
            Some(index) => Ok(self.projects.remove(index)),
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// The saved projects in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wardrobe() -> Project {
        Project::new(
            "Roupeiro Central".to_string(),
            "Roupeiro de 3 portas".to_string(),
            vec![
                ProjectItem::new("1", Quantity::from_hundredths(200)),
                ProjectItem::new("2", Quantity::from_hundredths(1000)),
            ],
        )
    }

    #[test]
    fn new_projects_clamp_low_quantities() {
        let project = Project::new(
            "Prateleira".to_string(),
            String::new(),
            vec![
                ProjectItem::new("1", Quantity::ZERO),
                ProjectItem::new("7", Quantity::from_hundredths(250)),
            ],
        );

        assert_eq!(project.items[0].quantity, Quantity::MIN);
        assert_eq!(project.items[1].quantity, Quantity::from_hundredths(250));
    }

    #[test]
    fn add_get_and_remove() {
        let mut projects = Projects::default();
        let project = wardrobe();
        let id = project.id.clone();

        projects.add(project).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects.get(&id).unwrap().name, "Roupeiro Central");

        let removed = projects.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(projects.is_empty());
    }

    #[test]
    #[should_panic(expected = "ExistingKey")]
    fn fail_add_same_id() {
        let mut projects = Projects::default();
        let project = wardrobe();
        projects.add(project.clone()).unwrap();
        projects.add(project).unwrap();
    }

    #[test]
    #[should_panic(expected = "KeyNotFound(\"missing\")")]
    fn fail_remove_missing_project() {
        let mut projects = Projects::default();
        projects.remove("missing").unwrap();
    }
}

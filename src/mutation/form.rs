use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{parse_timestamp, CategoryId, Event, NewEvent, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Description,
    Image,
    Location,
    StartTime,
    EndTime,
    CategoryIds,
    CreatedBy,
}

impl Field {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Image => "Image URL",
            Self::Location => "Location",
            Self::StartTime => "Start Time",
            Self::EndTime => "End Time",
            Self::CategoryIds => "Categories",
            Self::CreatedBy => "Created By",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", content = "reason", rename_all = "lowercase")]
pub enum Problem {
    Missing,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldProblem {
    pub field: Field,
    #[serde(flatten)]
    pub problem: Problem,
}

/// Form input that cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.title())]
pub struct ValidationError {
    pub problems: Vec<FieldProblem>,
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        if self.has_missing() {
            "Missing required fields"
        } else {
            "Invalid field values"
        }
    }

    pub fn description(&self) -> String {
        if self.has_missing() {
            return "Please fill in all fields before submitting.".to_string();
        }
        self.problems
            .iter()
            .filter_map(|p| match &p.problem {
                Problem::Invalid(reason) => Some(format!("{}: {}", p.field, reason)),
                Problem::Missing => None,
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn fields(&self) -> Vec<Field> {
        self.problems.iter().map(|p| p.field).collect()
    }

    fn has_missing(&self) -> bool {
        self.problems.iter().any(|p| p.problem == Problem::Missing)
    }
}

/// Raw values of the add/edit event form.
///
/// Category and creator ids arrive as the strings an input produces; they
/// are only turned into ids by [`EventForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub image: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(deserialize_with = "ids_as_strings")]
    pub category_ids: Vec<String>,
    #[serde(deserialize_with = "id_as_string")]
    pub created_by: String,
}

impl EventForm {
    /// Form pre-filled with an existing event, as the edit dialog opens it.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            image: event.image.clone(),
            location: event.location.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            category_ids: event.category_ids.iter().map(ToString::to_string).collect(),
            created_by: event
                .created_by
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn toggle_category(&mut self, id: CategoryId, checked: bool) {
        let id = id.to_string();
        self.category_ids.retain(|existing| existing.trim() != id);
        if checked {
            self.category_ids.push(id);
        }
    }

    pub fn validate(&self) -> Result<NewEvent, ValidationError> {
        let mut problems = Vec::new();

        let text_fields = [
            (Field::Title, &self.title),
            (Field::Description, &self.description),
            (Field::Image, &self.image),
            (Field::Location, &self.location),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() {
                problems.push(missing(field));
            }
        }

        for (field, value) in [
            (Field::StartTime, &self.start_time),
            (Field::EndTime, &self.end_time),
        ] {
            if value.trim().is_empty() {
                problems.push(missing(field));
            } else if parse_timestamp(value).is_none() {
                problems.push(invalid(field, format!("'{value}' is not a date and time")));
            }
        }

        let category_ids = self.parse_category_ids(&mut problems);
        let created_by = self.parse_created_by(&mut problems);

        if !problems.is_empty() {
            return Err(ValidationError { problems });
        }

        Ok(NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            location: self.location.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            category_ids,
            created_by: created_by.unwrap_or_default(),
        })
    }

    fn parse_category_ids(&self, problems: &mut Vec<FieldProblem>) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = Vec::with_capacity(self.category_ids.len());
        for raw in self.category_ids.iter().map(|raw| raw.trim()) {
            match raw.parse::<CategoryId>() {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => {
                    problems.push(invalid(
                        Field::CategoryIds,
                        format!("'{raw}' is not a category id"),
                    ));
                    return ids;
                }
            }
        }
        if ids.is_empty() {
            problems.push(missing(Field::CategoryIds));
        }
        ids
    }

    fn parse_created_by(&self, problems: &mut Vec<FieldProblem>) -> Option<UserId> {
        let raw = self.created_by.trim();
        if raw.is_empty() {
            problems.push(missing(Field::CreatedBy));
            return None;
        }
        match raw.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(_) => {
                problems.push(invalid(
                    Field::CreatedBy,
                    format!("'{raw}' is not a user id"),
                ));
                None
            }
        }
    }
}

fn missing(field: Field) -> FieldProblem {
    FieldProblem {
        field,
        problem: Problem::Missing,
    }
}

fn invalid(field: Field, reason: String) -> FieldProblem {
    FieldProblem {
        field,
        problem: Problem::Invalid(reason),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw: Option<RawId> = Option::deserialize(deserializer)?;
    Ok(raw.map(String::from).unwrap_or_default())
}

fn ids_as_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw: Option<Vec<RawId>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

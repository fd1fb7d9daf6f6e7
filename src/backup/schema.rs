//! Storage schema descriptor
//!
//! A hand-maintained description of the relational layout the entity store
//! uses, exported alongside backups so data can be recovered manually with
//! ordinary database tooling. It documents the layout; it does not inspect
//! the live store.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{IronlogError, IronlogResult};
use crate::storage::write_bytes_atomic;

use super::snapshot::SCHEMA_VERSION;

/// Default file name for the exported descriptor
pub const SCHEMA_FILE_NAME: &str = "ironlog-schema.json";

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescriptor {
    pub schema_version: &'static str,
    pub tables: Vec<TableDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: Vec<ColumnDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub data_type: &'static str,
    pub nullable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDescriptor {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
    pub unique: bool,
}

impl ColumnDescriptor {
    fn new(name: &'static str, data_type: &'static str) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
            primary_key: false,
            default: None,
            references: None,
        }
    }

    fn id() -> Self {
        Self {
            primary_key: true,
            ..Self::new("id", "uuid")
        }
    }

    fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    fn references(mut self, table: &'static str, on_delete: &'static str) -> Self {
        self.references = Some(ForeignKey {
            table,
            column: "id",
            on_delete,
        });
        self
    }
}

fn index(name: &'static str, columns: &[&'static str]) -> IndexDescriptor {
    IndexDescriptor {
        name,
        columns: columns.to_vec(),
        unique: false,
    }
}

/// Describe the storage layout
pub fn describe_schema() -> SchemaDescriptor {
    type C = ColumnDescriptor;

    SchemaDescriptor {
        schema_version: SCHEMA_VERSION,
        tables: vec![
            TableDescriptor {
                name: "categories",
                description: "Exercise categories",
                columns: vec![
                    C::id(),
                    C::new("name", "text"),
                    C::new("color", "text"),
                    C::new("created_at", "timestamptz").default("now()"),
                ],
                indexes: vec![index("idx_categories_name", &["name"])],
            },
            TableDescriptor {
                name: "exercises",
                description: "Exercise catalog",
                columns: vec![
                    C::id(),
                    C::new("name", "text"),
                    C::new("description", "text").nullable(),
                    C::new("category", "uuid")
                        .nullable()
                        .references("categories", "set null"),
                    C::new("image_url", "text").nullable(),
                    C::new("created_at", "timestamptz").default("now()"),
                ],
                indexes: vec![index("idx_exercises_category", &["category"])],
            },
            TableDescriptor {
                name: "workouts",
                description: "Scheduled and completed workout sessions",
                columns: vec![
                    C::id(),
                    C::new("name", "text"),
                    C::new("description", "text").nullable(),
                    C::new("date", "date"),
                    C::new("completed", "boolean").default("false"),
                    C::new("progress", "numeric").nullable(),
                    C::new("archived", "boolean").nullable().default("false"),
                    C::new("created_at", "timestamptz").default("now()"),
                ],
                indexes: vec![index("idx_workouts_date", &["date"])],
            },
            TableDescriptor {
                name: "workout_exercises",
                description: "Exercises performed within a workout",
                columns: vec![
                    C::id(),
                    C::new("workout_id", "uuid").references("workouts", "cascade"),
                    C::new("exercise_id", "uuid").references("exercises", "cascade"),
                    C::new("order", "integer").default("0"),
                ],
                indexes: vec![
                    index("idx_workout_exercises_workout_id", &["workout_id"]),
                    index("idx_workout_exercises_exercise_id", &["exercise_id"]),
                ],
            },
            TableDescriptor {
                name: "exercise_sets",
                description: "Sets recorded for a workout exercise",
                columns: vec![
                    C::id().default("gen_random_uuid()"),
                    C::new("workout_exercise_id", "uuid")
                        .references("workout_exercises", "cascade"),
                    C::new("set_number", "integer"),
                    C::new("weight", "numeric").nullable(),
                    C::new("target_reps", "integer"),
                    C::new("actual_reps", "integer").nullable(),
                    C::new("completed", "boolean").default("false"),
                    C::new("notes", "text").nullable(),
                ],
                indexes: vec![index(
                    "idx_exercise_sets_workout_exercise_id",
                    &["workout_exercise_id"],
                )],
            },
        ],
    }
}

impl SchemaDescriptor {
    /// Pretty JSON rendering
    pub fn to_json(&self) -> IronlogResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| IronlogError::Json(format!("Failed to serialize schema: {}", e)))
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Write the schema descriptor to `dest`
///
/// When `dest` is a directory the file is named [`SCHEMA_FILE_NAME`].
pub fn export_schema(dest: &Path) -> IronlogResult<PathBuf> {
    let target = if dest.is_dir() {
        dest.join(SCHEMA_FILE_NAME)
    } else {
        dest.to_path_buf()
    };

    write_bytes_atomic(&target, &describe_schema().to_json()?)?;
    info!(path = %target.display(), "Schema descriptor exported");
    Ok(target)
}

/// Write-request bodies and their validation rules
///
/// Field bounds:
///
/// | Field | Rule |
/// |---|---|
/// | board `name` | required, ≤ 100 chars |
/// | column `name` | required, ≤ 50 chars |
/// | `color` | `#RRGGBB` |
/// | task / subtask `title` | required, ≤ 200 chars |
/// | `description` | ≤ 1000 chars |
/// | `order` | integer ≥ 0 |
/// | `boardId`, `columnId` | UUID |
///
/// Required text fields default to `""` when missing so that an absent field
/// is reported alongside every other violation. On update requests every
/// field is optional and only checked when present. Each type also lists the
/// JSON type of its fields ([`FieldTypes`]) so that a mistyped `order` or
/// `isCompleted` is reported with the rest instead of failing the whole body.
///
/// The same types serialize the request bodies sent by `kanban-client`.

use super::{
    board_id, column_id, hex_color, parse_hyphenated, required, trimmed, FieldType, FieldTypes,
    FieldViolation, Kind,
};
use crate::models::board::{CreateBoard, NewColumn, UpdateBoard};
use crate::models::column::{CreateColumn, UpdateColumn};
use crate::models::subtask::{NewSubtask, UpdateSubtask};
use crate::models::task::{CreateTask, UpdateTask};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// `POST /api/boards`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(
        custom(function = "required", message = "Board name is required"),
        length(max = 100, message = "Board name must be between 1 and 100 characters")
    )]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub columns: Vec<ColumnDraft>,
}

/// Column given inline in `CreateBoardRequest::columns`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDraft {
    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(
        custom(function = "required", message = "Column name is required"),
        length(max = 50, message = "Column name must be between 1 and 50 characters")
    )]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// `PUT /api/boards/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        custom(function = "required", message = "Board name cannot be empty"),
        length(max = 100, message = "Board name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,
}

/// `POST /api/columns`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(
        custom(function = "required", message = "Column name is required"),
        length(max = 50, message = "Column name must be between 1 and 50 characters")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(custom(function = "board_id"))]
    pub board_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// `PUT /api/columns/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnRequest {
    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        custom(function = "required", message = "Column name cannot be empty"),
        length(max = 50, message = "Column name must be between 1 and 50 characters")
    )]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// `POST /api/tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(
        custom(function = "required", message = "Task title is required"),
        length(max = 200, message = "Task title must be between 1 and 200 characters")
    )]
    pub title: String,

    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(custom(function = "column_id"))]
    pub column_id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub subtasks: Vec<SubtaskDraft>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// Subtask given inline in `CreateTaskRequest::subtasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskDraft {
    #[serde(default, deserialize_with = "trimmed::string")]
    #[validate(
        custom(function = "required", message = "Subtask title is required"),
        length(max = 200, message = "Subtask title must be between 1 and 200 characters")
    )]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// `PUT /api/tasks/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        custom(function = "required", message = "Task title cannot be empty"),
        length(max = 200, message = "Task title must be between 1 and 200 characters")
    )]
    pub title: Option<String>,

    /// An empty string clears the description
    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "super::column_id"))]
    pub column_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Order must be a non-negative integer"))]
    pub order: Option<i32>,
}

/// `PUT /api/subtasks/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubtaskRequest {
    #[serde(
        default,
        deserialize_with = "trimmed::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        custom(function = "required", message = "Subtask title cannot be empty"),
        length(max = 200, message = "Subtask title must be between 1 and 200 characters")
    )]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

fn parse_uuid(field: &str, message: &str, raw: &str) -> Result<Uuid, Vec<FieldViolation>> {
    parse_hyphenated(raw).ok_or_else(|| vec![FieldViolation::new(field, message)])
}

const ORDER: FieldType =
    FieldType::new("order", Kind::Integer, "Order must be a non-negative integer");
const COLOR: FieldType = FieldType::new("color", Kind::Text, "Color must be a valid hex color");
const DESCRIPTION: FieldType =
    FieldType::new("description", Kind::Text, "Description must be a string");
const BOARD_NAME: FieldType = FieldType::new("name", Kind::Text, "Board name must be a string");
const COLUMN_NAME: FieldType = FieldType::new("name", Kind::Text, "Column name must be a string");
const TASK_TITLE: FieldType = FieldType::new("title", Kind::Text, "Task title must be a string");
const SUBTASK_TITLE: FieldType =
    FieldType::new("title", Kind::Text, "Subtask title must be a string");
const BOARD_ID: FieldType = FieldType::new("boardId", Kind::Text, "Invalid board ID");
const COLUMN_ID: FieldType = FieldType::new("columnId", Kind::Text, "Invalid column ID");
const IS_COMPLETED: FieldType =
    FieldType::new("isCompleted", Kind::Boolean, "isCompleted must be a boolean");

impl FieldTypes for CreateBoardRequest {
    const FIELD_TYPES: &'static [FieldType] = &[
        BOARD_NAME,
        FieldType::new(
            "columns",
            Kind::List(ColumnDraft::FIELD_TYPES),
            "Columns must be an array",
        ),
    ];
}

impl FieldTypes for ColumnDraft {
    const FIELD_TYPES: &'static [FieldType] = &[COLUMN_NAME, COLOR, ORDER];
}

impl FieldTypes for UpdateBoardRequest {
    const FIELD_TYPES: &'static [FieldType] = &[BOARD_NAME];
}

impl FieldTypes for CreateColumnRequest {
    const FIELD_TYPES: &'static [FieldType] = &[COLUMN_NAME, BOARD_ID, COLOR, ORDER];
}

impl FieldTypes for UpdateColumnRequest {
    const FIELD_TYPES: &'static [FieldType] = &[COLUMN_NAME, COLOR, ORDER];
}

impl FieldTypes for CreateTaskRequest {
    const FIELD_TYPES: &'static [FieldType] = &[
        TASK_TITLE,
        DESCRIPTION,
        COLUMN_ID,
        FieldType::new(
            "subtasks",
            Kind::List(SubtaskDraft::FIELD_TYPES),
            "Subtasks must be an array",
        ),
        ORDER,
    ];
}

impl FieldTypes for SubtaskDraft {
    const FIELD_TYPES: &'static [FieldType] = &[SUBTASK_TITLE, IS_COMPLETED, ORDER];
}

impl FieldTypes for UpdateTaskRequest {
    const FIELD_TYPES: &'static [FieldType] = &[TASK_TITLE, DESCRIPTION, COLUMN_ID, ORDER];
}

impl FieldTypes for UpdateSubtaskRequest {
    const FIELD_TYPES: &'static [FieldType] = &[SUBTASK_TITLE, IS_COMPLETED];
}

impl From<CreateBoardRequest> for CreateBoard {
    fn from(req: CreateBoardRequest) -> Self {
        CreateBoard {
            name: req.name,
            columns: req
                .columns
                .into_iter()
                .map(|column| NewColumn {
                    name: column.name,
                    color: column.color,
                    order: column.order,
                })
                .collect(),
        }
    }
}

impl From<UpdateBoardRequest> for UpdateBoard {
    fn from(req: UpdateBoardRequest) -> Self {
        UpdateBoard { name: req.name }
    }
}

impl TryFrom<CreateColumnRequest> for CreateColumn {
    type Error = Vec<FieldViolation>;

    fn try_from(req: CreateColumnRequest) -> Result<Self, Self::Error> {
        Ok(CreateColumn {
            board_id: parse_uuid("boardId", "Invalid board ID", &req.board_id)?,
            name: req.name,
            color: req.color,
            order: req.order,
        })
    }
}

impl From<UpdateColumnRequest> for UpdateColumn {
    fn from(req: UpdateColumnRequest) -> Self {
        UpdateColumn {
            name: req.name,
            color: req.color,
            order: req.order,
        }
    }
}

impl TryFrom<CreateTaskRequest> for CreateTask {
    type Error = Vec<FieldViolation>;

    fn try_from(req: CreateTaskRequest) -> Result<Self, Self::Error> {
        Ok(CreateTask {
            column_id: parse_uuid("columnId", "Invalid column ID", &req.column_id)?,
            title: req.title,
            description: req.description,
            order: req.order,
            subtasks: req
                .subtasks
                .into_iter()
                .map(|subtask| NewSubtask {
                    title: subtask.title,
                    is_completed: subtask.is_completed,
                    order: subtask.order,
                })
                .collect(),
        })
    }
}

impl TryFrom<UpdateTaskRequest> for UpdateTask {
    type Error = Vec<FieldViolation>;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let column_id = match req.column_id {
            Some(raw) => Some(parse_uuid("columnId", "Invalid column ID", &raw)?),
            None => None,
        };

        Ok(UpdateTask {
            title: req.title,
            description: req.description,
            column_id,
            order: req.order,
        })
    }
}

impl From<UpdateSubtaskRequest> for UpdateSubtask {
    fn from(req: UpdateSubtaskRequest) -> Self {
        UpdateSubtask {
            title: req.title,
            is_completed: req.is_completed,
        }
    }
}

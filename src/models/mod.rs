//! Models module for the SDK
//!
//! Column schemas, record path accessors and the reference data (departments, template
//! identifiers) the transformation engine works with.

pub mod column;
pub mod department;
pub mod enums;
pub mod record;
pub mod template;
pub mod value_enum;

pub use column::{Children, ColumnIdFactory, ColumnSchema, ColumnsFn, DataIndex, TabGroup, column_id};
pub use department::{
    DepartmentDirectory, DepartmentInfo, OrgTreeNode, POSITION_SEPARATOR, PositionInfo,
    department_tree,
};
pub use enums::*;
pub use record::{PathSegment, get_path, merge_shallow, parse_path, set_path, stringify};
pub use template::TemplateIdentifier;
pub use value_enum::{EnumFn, EnumLabel, EnumMap, ValueEnum};

//! HR vertical slice: employee records kept in memory behind a single
//! reader-writer lock.

mod error;
mod model;
mod pagination;
mod store;

pub use error::{HrError, HrResult};
pub use model::{Employee, EmployeeId, decode_employee, parse_employee_id};
pub use pagination::PageRequest;
pub use store::{EmployeeRecords, EmployeeStore};

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};
use serde_json::Value;

use crate::{HrError, HrResult};

pub type EmployeeId = i64;

/// A single employee record. Fields missing from a request body fall back to
/// their zero values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    pub salary: f64,
}

impl Employee {
    /// Assign one decoded member. Keys match field names without regard to
    /// ASCII case; `null` leaves the field untouched; unknown keys are skipped.
    fn assign(&mut self, key: &str, value: Value) -> serde_json::Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if key.eq_ignore_ascii_case("id") {
            self.id = serde_json::from_value(value)?;
        } else if key.eq_ignore_ascii_case("name") {
            self.name = serde_json::from_value(value)?;
        } else if key.eq_ignore_ascii_case("position") {
            self.position = serde_json::from_value(value)?;
        } else if key.eq_ignore_ascii_case("salary") {
            self.salary = serde_json::from_value(value)?;
        }
        Ok(())
    }
}

/// Parse an identifier taken from a request path.
pub fn parse_employee_id(raw: &str) -> HrResult<EmployeeId> {
    raw.parse::<EmployeeId>()
        .map_err(|_| HrError::InvalidId(raw.to_string()))
}

/// Decode the first JSON value of a request body into an [`Employee`].
///
/// The body must be an object or `null`. Members are applied in document
/// order, so a repeated key keeps its last value. Anything after the first
/// value is ignored; an empty body is rejected.
pub fn decode_employee(body: &[u8]) -> HrResult<Employee> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Members>();
    let members = match values.next() {
        Some(Ok(Members(members))) => members,
        Some(Err(err)) => return Err(HrError::InvalidPayload(err)),
        None => {
            return Err(HrError::InvalidPayload(de::Error::custom(
                "EOF while parsing a value",
            )));
        }
    };

    let mut employee = Employee::default();
    for (key, value) in members {
        employee
            .assign(&key, value)
            .map_err(HrError::InvalidPayload)?;
    }
    Ok(employee)
}

/// Object members in document order; `null` decodes to no members.
struct Members(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = Members;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Members, E> {
                Ok(Members(Vec::new()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Members, A::Error> {
                let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(member) = map.next_entry::<String, Value>()? {
                    members.push(member);
                }
                Ok(Members(members))
            }
        }

        deserializer.deserialize_any(MembersVisitor)
    }
}

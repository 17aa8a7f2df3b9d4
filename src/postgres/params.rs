use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

use crate::types::RowValues;

/// Whether this particular value can be encoded for a parameter of type `ty`.
fn value_fits(value: &RowValues, ty: &Type) -> bool {
    match value {
        RowValues::Int(_) => matches!(*ty, Type::INT2 | Type::INT4 | Type::INT8),
        RowValues::Float(_) => matches!(*ty, Type::FLOAT4 | Type::FLOAT8),
        RowValues::Text(_) => <String as ToSql>::accepts(ty),
        RowValues::Bool(_) => *ty == Type::BOOL,
        RowValues::Timestamp(_) => *ty == Type::TIMESTAMP,
        RowValues::Null => true,
        RowValues::JSON(_) => matches!(*ty, Type::JSON | Type::JSONB),
        RowValues::Blob(_) => *ty == Type::BYTEA,
    }
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        // `accepts` only sees the type, so a text value aimed at an int column
        // would otherwise be written as raw bytes.
        if !value_fits(self, ty) {
            return Err(Box::new(WrongType::new::<RowValues>(ty.clone())));
        }
        match self {
            // Narrow to the column's integer width; i64 only encodes as INT8.
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => b.to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

/// Borrow bound values as the trait objects tokio-postgres expects.
#[must_use]
pub fn as_refs<'a>(values: &[&'a RowValues]) -> Vec<&'a (dyn ToSql + Sync)> {
    values
        .iter()
        .map(|value| *value as &(dyn ToSql + Sync))
        .collect()
}

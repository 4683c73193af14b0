//! Activity ledgers.
//!
//! Three append-only ledgers record daily activity: attendance for hourly
//! employees, sales for commissioned employees, and service fees charged to
//! union members. All range queries are half-open `[start, end)`.

mod attendance;
mod sales;
mod union_fees;

pub use attendance::AttendanceLedger;
pub use sales::SalesLedger;
pub use union_fees::UnionFeeLedger;

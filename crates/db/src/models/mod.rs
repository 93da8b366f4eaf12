//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - String-backed status/role enums mapping to TEXT columns
//! - Create/update DTOs used by the repositories

pub mod member;
pub mod order;
pub mod product;
pub mod session;

/// Implements the database plumbing for a status/role enum stored in a
/// plain `TEXT` column: `as_str`, `FromStr`, and the sqlx `Type` /
/// `Encode` / `Decode` traits delegating to `&str`.
///
/// The schema constrains allowed values with CHECK constraints rather than
/// Postgres enum types, so the wire type must be `TEXT` -- a derived
/// `sqlx::Type` would look up a database type by the enum's name instead.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:expr),+ $(,)? }) => {
        impl $name {
            /// String form as stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $text {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!(
                    concat!("invalid ", stringify!($name), " value: {s}"),
                    s = s
                ))
            }
        }

        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> ::sqlx::Encode<'q, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<'q, ::sqlx::Postgres>>::encode_by_ref(
                    &self.as_str(),
                    buf,
                )
            }
        }

        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<'r, ::sqlx::Postgres>>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }
    };
}

pub(crate) use text_enum;

//! `define_port_error!` declares a `thiserror` enum for a driven port.
//!
//! Every variant carries named fields. The macro also emits one snake-case
//! constructor per variant whose parameters accept `impl Into<T>`, so
//! adapters can write `ShipmentRepositoryError::query("timeout")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

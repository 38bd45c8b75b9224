//! Helper macro for store-port error enums.
//!
//! Every driven port distinguishes the same failure classes (connection vs
//! query, plus the odd port-specific one); this keeps the enums and their
//! string-taking constructors from being written out long-hand each time.

macro_rules! define_store_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ctor:ident) => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                /// Build the variant from anything stringly.
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::$variant { message: message.into() }
                }
            )*
        }
    };
}

pub(crate) use define_store_error;

//! Helper macro for declaring port error enums.
//!
//! Each variant carries named fields and a display template; the macro
//! derives `thiserror::Error` and emits a snake_case constructor per variant
//! whose parameters accept anything convertible into the field types.

macro_rules! define_port_error {
    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SinkPortError {
            Closed { sink: String } => "sink {sink} closed",
            Rejected { sink: String, status: u16 } => "sink {sink} rejected entry with {status}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SinkPortError::closed("console");
        assert_eq!(err.to_string(), "sink console closed");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SinkPortError::rejected("logtail", 401_u16);
        assert_eq!(err.to_string(), "sink logtail rejected entry with 401");
        assert_eq!(
            err,
            SinkPortError::Rejected {
                sink: "logtail".to_owned(),
                status: 401
            }
        );
    }
}

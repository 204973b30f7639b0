//! Macros for defining label enums.

/// Macro for defining a kind enum whose variants are identified by
/// human-readable labels.
///
/// Labels are used for [`Display`], [`FromStr`] and [`serde`]
/// representations, so an unknown label never produces a value.
///
/// # Example
///
/// ```rust
/// common::define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube."]
///         #[label = "Cube"]
///         Cube = 1,
///
///         #[doc = "A sphere."]
///         #[label = "Round Sphere"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::Sphere.to_string(), "Round Sphere");
/// assert_eq!("Cube".parse::<Kind>(), Ok(Kind::Cube));
/// assert!("Pyramid".parse::<Kind>().is_err());
/// ```
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                #[label = $label:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[doc = $doc]
        #[repr(u8)]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[strum(serialize = $label)]
                $variant = $value,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Returns the label of this variant.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                let label = <::std::string::String as
                    $crate::private::serde::Deserialize<'de>>::deserialize(
                    deserializer,
                )?;
                label.parse().map_err(|_| {
                    <D::Error as $crate::private::serde::de::Error>::custom(
                        ::std::format!(
                            "unknown `{}` label: `{label}`",
                            ::core::stringify!($name),
                        ),
                    )
                })
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_kind! {
        #[doc = "Test kind."]
        enum Shape {
            #[doc = "A cube."]
            #[label = "Cube"]
            Cube = 1,

            #[doc = "A sphere."]
            #[label = "Round Sphere"]
            Sphere = 2,
        }
    }

    #[test]
    fn uses_labels() {
        assert_eq!(Shape::Cube.to_string(), "Cube");
        assert_eq!(Shape::Sphere.label(), "Round Sphere");
        assert_eq!("Round Sphere".parse::<Shape>(), Ok(Shape::Sphere));
        assert!("Sphere".parse::<Shape>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Shape::Sphere).unwrap(),
            r#""Round Sphere""#,
        );
        assert_eq!(
            serde_json::from_str::<Shape>(r#""Cube""#).unwrap(),
            Shape::Cube,
        );
        assert!(serde_json::from_str::<Shape>(r#""Pyramid""#).is_err());
    }

    #[test]
    fn lists_all_in_order() {
        assert_eq!(Shape::ALL, &[Shape::Cube, Shape::Sphere]);
        assert_eq!(Shape::Sphere.u8(), 2);
    }
}

/// Generate enums for codepoints in protocols.
///
/// # Example
///
/// ```rust
/// # #[macro_use] extern crate nlricore;
/// # fn main() {
/// typeenum!(Afi, u16,
///     {
///         1 => Ipv4,
///         2 => Ipv6,
///     });
///
/// assert_eq!(Afi::from(2), Afi::Ipv6);
/// assert_eq!(u16::from(Afi::Unimplemented(25)), 25);
/// # }
/// ```
/// This will create a `pub enum Afi`, comprised of variants `Ipv4`, `Ipv6`
/// and `Unimplemented(u16)`. On this enum, the [`From`] (for conversion
/// between the variants and `u16`) and [`std::fmt::Display`] traits are
/// implemented.
///
#[macro_export]
macro_rules! typeenum {
    ($(#[$attr:meta])* $name:ident, $ty:ty,
        { $($x:expr => $y:ident),+ $(,)* }
    ) => {
        #[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
        $(#[$attr])*
        pub enum $name {
            $($y),+,
            Unimplemented($ty),
        }

        impl From<$ty> for $name {
            fn from(f: $ty) -> $name {
                match f {
                    $($x => $name::$y,)+
                    u => $name::Unimplemented(u),
                }
            }
        }

        impl From<$name> for $ty {
            fn from(s: $name) -> $ty {
                match s {
                    $($name::$y => $x,)+
                    $name::Unimplemented(u) => u,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter)
                -> Result<(), std::fmt::Error>
            {
                match self {
                    $($name::$y => write!(f, stringify!($y))),+,
                    $name::Unimplemented(u) =>
                        write!(f, "unknown-{}-{}", stringify!($name), u)
                }
            }
        }
    }
}

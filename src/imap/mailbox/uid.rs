use std::{fmt::Display, num::NonZeroU32};

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Uid(NonZeroU32);

impl Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u32> for Uid {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or("uid should not be zero")
    }
}

impl TryFrom<&u32> for Uid {
    type Error = <Self as TryFrom<u32>>::Error;

    fn try_from(value: &u32) -> Result<Self, Self::Error> {
        Self::try_from(*value)
    }
}

impl From<Uid> for u32 {
    fn from(value: Uid) -> Self {
        value.0.into()
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_uid_rejects_zero() {
        assert_err!(Uid::try_from(0));
    }

    #[rstest]
    #[case(1)]
    #[case(u32::MAX)]
    fn test_uid_from_and_to_u32_is_consistent(#[case] num: u32) {
        let uid = assert_ok!(Uid::try_from(&num));
        assert_eq!(num, u32::from(uid));
        assert_eq!(num.to_string(), uid.to_string());
    }
}

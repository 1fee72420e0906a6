use std::fmt;

/// Action taken when a non-nullable field receives a null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OnConflictAction {
    None,
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
    Default,
}

impl OnConflictAction {
    pub const ALL: [OnConflictAction; 7] = [
        Self::None,
        Self::Rollback,
        Self::Abort,
        Self::Fail,
        Self::Ignore,
        Self::Replace,
        Self::Default,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rollback => "rollback",
            Self::Abort => "abort",
            Self::Fail => "fail",
            Self::Ignore => "ignore",
            Self::Replace => "replace",
            Self::Default => "default",
        }
    }

    pub fn by_name<N: AsRef<[u8]>>(name: N) -> Option<Self> {
        let name = name.as_ref();
        Self::ALL
            .into_iter()
            .find(|action| action.name().as_bytes().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for OnConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionType {
    None,
    Zstd,
    Lz4,
}

impl CompressionType {
    pub const ALL: [CompressionType; 3] = [Self::None, Self::Zstd, Self::Lz4];

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
        }
    }

    pub fn by_name<N: AsRef<[u8]>>(name: N) -> Option<Self> {
        let name = name.as_ref();
        Self::ALL
            .into_iter()
            .find(|compression| compression.name().as_bytes().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        for action in OnConflictAction::ALL {
            assert_eq!(OnConflictAction::by_name(action.name()), Some(action));
        }
        assert_eq!(OnConflictAction::by_name("ABORT"), Some(OnConflictAction::Abort));
        assert_eq!(OnConflictAction::by_name("explode"), None);
    }

    #[test]
    fn test_compression_names() {
        for compression in CompressionType::ALL {
            assert_eq!(CompressionType::by_name(compression.name()), Some(compression));
        }
        assert_eq!(CompressionType::by_name("gzip"), None);
    }
}

/// Error codes with category prefix
///
/// All import failures share the IMP category:
/// - IMP001-IMP002: source resolution
/// - IMP003-IMP006: target layout validation
/// - IMP007: cache population
/// - IMP008: workspace link
/// - IMP009: state record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input is neither a URL nor an existing path
    Imp001,
    /// Input path is not a regular file
    Imp002,
    /// Output (or its cache entry) already exists
    Imp003,
    /// Output directory is missing
    Imp004,
    /// Output is outside of the data directory
    Imp005,
    /// Output is inside the cache or state directory
    Imp006,
    /// Fetch into the cache failed
    Imp007,
    /// Symlink creation failed
    Imp008,
    /// State record could not be written
    Imp009,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "IMP001")
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Imp001 => "IMP001",
            ErrorCode::Imp002 => "IMP002",
            ErrorCode::Imp003 => "IMP003",
            ErrorCode::Imp004 => "IMP004",
            ErrorCode::Imp005 => "IMP005",
            ErrorCode::Imp006 => "IMP006",
            ErrorCode::Imp007 => "IMP007",
            ErrorCode::Imp008 => "IMP008",
            ErrorCode::Imp009 => "IMP009",
        }
    }

    /// Returns the general cause description
    pub fn cause(&self) -> &'static str {
        match self {
            ErrorCode::Imp001 => "The input is not a valid URL and no such local file exists",
            ErrorCode::Imp002 => "The input path exists but is not a regular file",
            ErrorCode::Imp003 => "The output path or its cache entry is already occupied",
            ErrorCode::Imp004 => "The directory that should contain the output does not exist",
            ErrorCode::Imp005 => "The output path is not inside the workspace data directory",
            ErrorCode::Imp006 => "The output path is inside the cache or state directory",
            ErrorCode::Imp007 => "The artifact bytes could not be copied or downloaded into the cache",
            ErrorCode::Imp008 => "The filesystem rejected the symbolic link",
            ErrorCode::Imp009 => "The state record could not be serialized or written",
        }
    }

    /// Returns remediation steps
    pub fn remediation(&self) -> &'static str {
        match self {
            ErrorCode::Imp001 => "1. Check the input path for typos\n2. Use a full http(s):// or ftp(s):// URL for remote files",
            ErrorCode::Imp002 => "1. Import individual files, not directories\n2. Point the input at the file itself",
            ErrorCode::Imp003 => "1. Choose another output name\n2. Remove a partial cache entry left by an interrupted import",
            ErrorCode::Imp004 => "1. Create the output directory first\n2. Create the matching directory under the state directory",
            ErrorCode::Imp005 => "1. Place the output under the data directory\n2. Check `data_dir` in nlx.toml",
            ErrorCode::Imp006 => "1. Place the output outside of the cache and state directories",
            ErrorCode::Imp007 => "1. Check your network connection or the input file\n2. Remove the partial cache file before retrying",
            ErrorCode::Imp008 => "1. Check that the filesystem supports symbolic links\n2. Remove the partial cache file before retrying",
            ErrorCode::Imp009 => "1. Check permissions of the state directory\n2. Re-run the import after removing the link and cache entry",
        }
    }
}

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy follows the pipeline's failure policy: structural errors (a class binary that
/// cannot be parsed) and lookup errors (a packet with no class or no documentation) are fatal
/// for one message type only; everything below that granularity is represented as a degraded
/// per-field outcome by the reconciler rather than an `Err`.
///
/// # Error Categories
///
/// ## Binary Parsing Errors
/// - [`Error::OutOfBounds`] - Attempted to read beyond the class file's boundaries
/// - [`Error::Malformed`] - Corrupted or invalid class file structure
/// - [`Error::NotSupported`] - Not a class file (bad magic number)
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// ## Lookup Errors
/// - [`Error::ClassNotFound`] - A message type has no registered class, or a class is
///   missing from the loaded set
/// - [`Error::DocsNotFound`] - A message type is absent from the protocol documentation
/// - [`Error::FieldNotFound`] - A field name could not be resolved through a class's ancestry
///
/// ## Analysis Errors
/// - [`Error::RecursionLimit`] - Maximum super-call recursion depth exceeded while scanning
#[derive(Error, Debug)]
pub enum Error {
    /// An out of bound access was attempted while parsing the file.
    ///
    /// This error occurs when trying to read data beyond the end of the class
    /// file. It's a safety check to prevent buffer overruns during parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The file is damaged and could not be parsed.
    ///
    /// This error indicates that the file structure is corrupted or doesn't
    /// conform to the JVM class file format. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// This file type is not supported.
    ///
    /// Indicates that the input file is not a JVM class file (the `0xCAFEBABE`
    /// magic number is missing).
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur during file operations
    /// such as reading from disk, permission issues, or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// No compiled class is registered for (or present in the class set under) the given name.
    ///
    /// Fatal for that single message type; the surrounding batch continues.
    #[error("Class not found - {0}")]
    ClassNotFound(String),

    /// The message type is absent from the loaded protocol documentation.
    ///
    /// Fatal for that single message type; the surrounding batch continues.
    #[error("Not found in documentation - {0}")]
    DocsNotFound(String),

    /// A field read instruction referenced a name that no class in the ancestry declares.
    ///
    /// Distinguishable per-field failure; the scanner records the position and continues.
    #[error("Field {field} not found in ancestry of {class}")]
    FieldNotFound {
        /// Internal name of the class whose ancestry was searched
        class: String,
        /// The unresolvable field name
        field: String,
    },

    /// Recursion limit reached.
    ///
    /// The super-call recursion while scanning a write method and the superclass
    /// walks of field resolution and memory-order enumeration are bounded to guard
    /// against cyclic or absurdly deep inheritance chains in hostile input.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

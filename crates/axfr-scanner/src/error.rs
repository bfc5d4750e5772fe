use derive_more::From;
use hickory_resolver::error::ResolveError;
use hickory_resolver::proto::error::ProtoError;
use hickory_resolver::proto::op::ResponseCode;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    // -- Zone transfer
    TransferRefused(ResponseCode),
    InvalidTransferStream(String),
    NoNameserverAddress(String),

    // -- Externals
    #[from]
    Io(std::io::Error),

    #[from]
    Proto(ProtoError),

    #[from]
    Resolve(ResolveError),
}

// region:    --- Error Boilerplate

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate

/// Lỗi chung của card và editor.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CardError {
    /// Cấu hình thiếu `entity`, card không thể khởi tạo.
    #[error("You must define an entity")]
    MissingEntity,
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),
    #[error("Could not read host state: {0}")]
    Parse(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось прочитать состояние: {0}")]
    StateRead(String),

    #[error("Канал уже подписан: {0}")]
    AlreadySubscribed(String),

    #[error("Канал не был подписан: {0}")]
    NotSubscribed(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! watch_error {
    (state_read, $($arg:tt)*) => {
        $crate::error::WatchError::StateRead(format!($($arg)*))
    };
}

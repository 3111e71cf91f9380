// 日志工具模块
//
// 封装 flexi_logger 的初始化和关闭操作，确保异步日志正确 flush

use crate::config::LogConfig;
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use parking_lot::Mutex;

/// 全局日志句柄，用于程序退出时 flush
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = parking_lot::const_mutex(None);

/// 初始化日志系统
///
/// 配置了日志目录时写入按大小轮转的文件，警告及以上同时输出到标准错误；
/// 否则只输出到标准错误。重复调用会返回错误。
///
/// # Arguments
/// * `config` - 日志配置
///
/// # Examples
/// ```no_run
/// use hopgraph::config::LogConfig;
/// use hopgraph::utils::logging;
///
/// logging::init(&LogConfig::default()).expect("日志初始化失败");
/// ```
pub fn init(config: &LogConfig) -> Result<(), FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(&config.level)?;
    let handle = match &config.dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().basename(&config.file).directory(dir))
            .rotate(
                Criterion::Size(config.max_file_size),
                Naming::Numbers,
                Cleanup::KeepLogFiles(config.max_files),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .write_mode(WriteMode::Async)
            .append()
            .start()?,
        None => logger.log_to_stderr().start()?,
    };

    *LOGGER_HANDLE.lock() = Some(handle);

    match &config.dir {
        Some(dir) => log::info!("日志系统初始化完成: {}/{}", dir, config.file),
        None => log::debug!("日志系统初始化完成: stderr"),
    }
    Ok(())
}

/// 刷新并关闭日志系统
///
/// 在程序退出前调用，确保所有异步日志都已写入文件
pub fn shutdown() {
    if let Some(handle) = LOGGER_HANDLE.lock().take() {
        handle.flush();
        // handle 在这里被 drop，会等待异步线程完成
    }
}

/// 检查日志系统是否已初始化
pub fn is_initialized() -> bool {
    LOGGER_HANDLE.lock().is_some()
}

/// `writeln!` that doesn't panic when the writer is closed early,
/// e.g. `android-devices list | head -n1`
#[macro_export]
macro_rules! writeln_or_ignore {
    ($w:expr, $($arg:tt)*) => {{
        use std::io::Write as _;
        let _ = writeln!($w, $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    /// A writer that is already closed.
    struct Closed;

    impl std::io::Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_is_ignored() {
        writeln_or_ignore!(Closed, "{}", 42);
        let mut buf = Vec::new();
        writeln_or_ignore!(&mut buf, "{}", 42);
        assert_eq!(buf, b"42\n");
    }
}

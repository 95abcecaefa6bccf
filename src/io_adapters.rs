use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;

/// Memory-backed writer for capturing command output.
///
/// Clones share one buffer, so the same capture can serve as both stdout and
/// stderr when the interleaving matters.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return inner Rc so caller can read collected bytes after command execution.
    pub fn into_inner(self) -> Rc<RefCell<Vec<u8>>> {
        self.buf
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }

    /// Everything written so far, decoded lossily.
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl crate::command::Stdout for MemWriter {
    /// No OS handle: external commands get a pipe whose contents are copied
    /// here after the child exits.
    fn stdio(&mut self) -> Option<Stdio> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Stdout;

    #[test]
    fn test_clones_share_buffer() {
        let (mut a, handle) = MemWriter::with_handle();
        let mut b = a.clone();
        a.write_all(b"out ").unwrap();
        b.write_all(b"err").unwrap();
        assert_eq!(&*handle.borrow(), b"out err");
        assert_eq!(a.contents_lossy(), "out err");
        assert!(b.stdio().is_none());
        assert_eq!(&*b.into_inner().borrow(), b"out err");
    }
}

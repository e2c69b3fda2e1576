//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("output name is empty");
        assert_eq!(err.to_string(), "configuration error: output name is empty");
    }

    #[test]
    fn test_root_unreadable() {
        let err = MergeError::root_unreadable("/srv/graphql", "not found");
        assert_eq!(
            err.to_string(),
            "cannot read root directory '/srv/graphql': not found"
        );
    }

    #[test]
    fn test_merge_error_conversion() {
        let merge_err = MergeError::OutputUnwritable {
            path: "/srv/graphql/unified.graphqls".to_string(),
            reason: "read-only file system".to_string(),
        };
        let err: Error = merge_err.into();
        assert!(matches!(err, Error::Merge(_)));
        assert!(err.to_string().starts_with("merge error: failed to write output"));
    }

    #[test]
    fn test_fragment_unreadable_display() {
        let err = MergeError::FragmentUnreadable {
            path: "types/user.graphqls".to_string(),
            reason: "stream did not contain valid UTF-8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read fragment 'types/user.graphqls': stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_watcher_error_conversion() {
        let watch_err = WatcherError::WatchFailed {
            path: "/tmp/test".to_string(),
            reason: "permission denied".to_string(),
        };
        let err: Error = watch_err.into();
        assert!(matches!(err, Error::Watcher(_)));
    }

    #[test]
    fn test_subprocess_error_failed() {
        let err = SubprocessError::Failed {
            program: "schemerge".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "[ERROR] boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'schemerge' exited with exit status: 1: [ERROR] boom"
        );
        let err: Error = err.into();
        assert!(matches!(err, Error::Subprocess(_)));
    }

    #[test]
    fn test_subprocess_error_timeout() {
        let err = SubprocessError::TimedOut {
            program: "schemerge".to_string(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "'schemerge' timed out after 30s");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_internal() {
        let err = Error::internal("merge task panicked");
        assert_eq!(err.to_string(), "internal error: merge task panicked");
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<usize> {
            Err(MergeError::root_unreadable("/missing", "no such directory").into())
        }

        fn outer() -> Result<usize> {
            let n = inner()?;
            Ok(n)
        }

        let result = outer();
        assert!(matches!(result, Err(Error::Merge(MergeError::RootUnreadable { .. }))));
    }
}

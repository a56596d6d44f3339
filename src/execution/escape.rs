//! Shell escaping for diagnostic command lines.
//!
//! Commands are always spawned from an argument vector. The escaped form is
//! only ever shown to humans, so they can copy it into a shell.

/// Escape an argument for the current platform's shell.
pub trait ShellEscape {
    fn shell_escape(&self) -> String;
}

impl ShellEscape for str {
    fn shell_escape(&self) -> String {
        if cfg!(windows) {
            if self.is_empty() {
                "\"\"".to_string()
            } else if self.contains(|c: char| c.is_whitespace() || "\"^%!<>&|()".contains(c)) {
                format!("\"{}\"", self.replace('"', "\"\""))
            } else {
                self.to_string()
            }
        } else if self.is_empty() {
            "''".to_string()
        } else if self
            .chars()
            .all(|c| c.is_alphanumeric() || "._-/=:@%+,".contains(c))
        {
            self.to_string()
        } else {
            format!("'{}'", self.replace('\'', "'\\''"))
        }
    }
}

/// Join arguments into a single escaped command line.
pub fn command_line<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().shell_escape())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_shell_escape_unix() {
        assert_eq!("php".shell_escape(), "php");
        assert_eq!("cache:clear".shell_escape(), "cache:clear");
        assert_eq!("--php-ini=/etc/php.ini".shell_escape(), "--php-ini=/etc/php.ini");
        assert_eq!("my app/console".shell_escape(), "'my app/console'");
        assert_eq!("it's".shell_escape(), "'it'\\''s'");
        assert_eq!("$HOME".shell_escape(), "'$HOME'");
        assert_eq!("".shell_escape(), "''");
    }

    #[test]
    #[cfg(windows)]
    fn test_shell_escape_windows() {
        assert_eq!("php.exe".shell_escape(), "php.exe");
        assert_eq!("C:\\Program Files\\php".shell_escape(), "\"C:\\Program Files\\php\"");
        assert_eq!("say \"hi\"".shell_escape(), "\"say \"\"hi\"\"\"");
    }

    #[test]
    #[cfg(unix)]
    fn test_command_line_join() {
        let line = command_line(["/usr/bin/php", "app/console", "cache:clear", "--no-warmup"]);
        assert_eq!(line, "/usr/bin/php app/console cache:clear --no-warmup");

        let line = command_line(["php", "assets:install", "web dir"]);
        assert_eq!(line, "php assets:install 'web dir'");
    }
}

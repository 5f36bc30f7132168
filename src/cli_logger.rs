pub struct CliLogger {
    no_color: bool,
}

impl CliLogger {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{} {msg}", self.style("error", "31;1"));
    }

    pub fn print_ready(&self, url: &str, context: &str) {
        eprintln!(
            "{} {url} {} {context}",
            self.style("profiler-ui", "36;1"),
            self.style("context", "90")
        );
    }

    fn style(&self, text: &str, ansi: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}

use clap::CommandFactory;
use clap_complete::{Shell as ClapShell, generate};

use crate::cli::{Cli, Shell};

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::Powershell => ClapShell::PowerShell,
        }
    }
}

pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    generate(ClapShell::from(shell), &mut cmd, "freqdeck", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_script_mentions_subcommands() {
        let mut cmd = Cli::command();
        let mut out = Vec::new();
        generate(ClapShell::Bash, &mut cmd, "freqdeck", &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("freqdeck"));
        assert!(script.contains("check"));
    }
}

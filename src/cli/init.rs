//! Shell integration
//!
//! A child process cannot change its parent's directory, so the printed
//! function runs the picker, captures the path from stdout and `cd`s there.
//! Subcommands pass straight through.

use crate::cli::InitShell;

const ZSH_INIT: &str = r#"# fuzzy-clone shell integration
# Add to ~/.zshrc:  eval "$(fuzzy-clone init zsh)"
fz() {
  if [ "$#" -gt 0 ]; then
    case "$1" in
      -*) ;;
      *) command fuzzy-clone "$@"; return $? ;;
    esac
  fi

  local dest
  dest="$(command fuzzy-clone "$@")" || return $?
  if [ -d "$dest" ]; then
    cd "$dest"
  elif [ -n "$dest" ]; then
    printf '%s\n' "$dest"
  fi
}
"#;

const FISH_INIT: &str = r#"# fuzzy-clone shell integration
# Add to ~/.config/fish/config.fish:  fuzzy-clone init fish | source
function fz --description 'Pick a repository, clone it if needed and cd into it'
    if test (count $argv) -gt 0; and not string match -q -- '-*' $argv[1]
        command fuzzy-clone $argv
        return $status
    end

    set -l dest (command fuzzy-clone $argv)
    or return $status

    if test (count $dest) -eq 1; and test -d "$dest[1]"
        cd $dest[1]
    else if test (count $dest) -gt 0
        printf '%s\n' $dest
    end
end
"#;

/// The integration script for `shell`
pub fn script(shell: InitShell) -> &'static str {
    match shell {
        InitShell::Zsh => ZSH_INIT,
        InitShell::Fish => FISH_INIT,
    }
}

/// Print the integration script
pub fn run(shell: InitShell) {
    print!("{}", script(shell));
}

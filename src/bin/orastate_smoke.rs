use std::env;

// Reuse library modules from the crate
use orastate::{ConnectionConfig, Error, Session};

fn usage() {
  eprintln!(
    "orastate Smoke CLI\n\n\
    Commands:\n\
      ping                                  Open a session and print the server version\n\
      sql --stmt <text>                     Execute one statement, print captured output\n\
      ddl --stmt <text> [--check]           Execute (or simulate with --check) one DDL,\n\
                                            then print the session history\n\n\
    Connection flags (all commands):\n\
      --host <host>         default localhost\n\
      --port <port>         default 1521\n\
      --service <name>      required\n\
      --user <username>     paired with --password; omit both for wallet auth\n\
      --password <password>\n\
      --sysdba              connect with SYSDBA privileges\n\
      --oracle-home <dir>   Oracle client installation root\n\
    "
  );
}

fn parse_flag(args: &[String], name: &str) -> Option<String> {
  let mut it = args.iter();
  while let Some(tok) = it.next() {
    if tok == name {
      return it.next().cloned();
    }
  }
  None
}

fn has_flag(args: &[String], name: &str) -> bool {
  args.iter().any(|tok| tok == name)
}

fn build_config(args: &[String]) -> Result<ConnectionConfig, String> {
  let host = parse_flag(args, "--host").unwrap_or_else(|| "localhost".to_string());
  let port = match parse_flag(args, "--port") {
    Some(v) => match v.parse::<u16>() {
      Ok(p) => p,
      Err(_) => return Err("Invalid --port".to_string()),
    },
    None => 1521,
  };
  let service = match parse_flag(args, "--service") {
    Some(v) => v,
    None => return Err("Missing --service".to_string()),
  };

  let mut config = ConnectionConfig::new(host, port, service);
  match (parse_flag(args, "--user"), parse_flag(args, "--password")) {
    (Some(user), Some(pass)) => config = config.credentials(user, pass),
    (None, None) => {}
    _ => return Err("--user and --password must be provided together".to_string()),
  }
  if has_flag(args, "--sysdba") {
    config = config.sysdba(true);
  }
  if let Some(home) = parse_flag(args, "--oracle-home") {
    config = config.oracle_home(home);
  }
  Ok(config)
}

fn report_failure(e: &Error) -> i32 {
  eprintln!("{}", e);
  if let Some(hint) = e.hint() {
    eprintln!("Hint: {}", hint);
  }
  1
}

fn open_session(args: &[String], simulate: bool) -> Result<Session, i32> {
  let config = match build_config(args) {
    Ok(c) => c,
    Err(msg) => {
      eprintln!("{}", msg);
      return Err(1);
    }
  };
  Session::open(&config, simulate).map_err(|e| report_failure(&e))
}

fn cmd_ping(args: &[String]) -> i32 {
  match open_session(args, false) {
    Ok(session) => {
      println!("Connected, server version {}", session.server_version());
      0
    }
    Err(code) => code,
  }
}

fn cmd_sql(args: &[String]) -> i32 {
  let stmt = match parse_flag(args, "--stmt") {
    Some(v) => v,
    None => {
      eprintln!("Missing --stmt");
      return 1;
    }
  };

  let mut session = match open_session(args, false) {
    Ok(s) => s,
    Err(code) => return code,
  };
  match session.execute_statement(&stmt) {
    Ok(lines) => {
      for line in &lines {
        println!("{}", line);
      }
      0
    }
    Err(e) => report_failure(&e),
  }
}

fn cmd_ddl(args: &[String]) -> i32 {
  let stmt = match parse_flag(args, "--stmt") {
    Some(v) => v,
    None => {
      eprintln!("Missing --stmt");
      return 1;
    }
  };
  let simulate = has_flag(args, "--check");

  let mut session = match open_session(args, simulate) {
    Ok(s) => s,
    Err(code) => return code,
  };
  let code = match session.execute_ddl(&stmt) {
    Ok(()) => 0,
    Err(e) => report_failure(&e),
  };
  for entry in session.ddl_history() {
    println!("{}", entry);
  }
  code
}

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() < 2 {
    usage();
    std::process::exit(1);
  }

  let rest = args[2..].to_vec();
  let code = match args[1].as_str() {
    "ping" => cmd_ping(&rest),
    "sql" => cmd_sql(&rest),
    "ddl" => cmd_ddl(&rest),
    _ => {
      usage();
      1
    }
  };

  std::process::exit(code);
}

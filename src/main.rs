use anyhow::{bail, Context};
use log::{info, Level};
use std::{
    env, fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use stack_compiler::{parser, printer::print_program, tokenizer::tokenize, Compilation};

#[derive(Debug, PartialEq)]
enum Command {
    Compile,
    Tokens,
    Ast,
}

#[derive(Debug, PartialEq)]
struct Config {
    command: Command,
    input: String,
    output: Option<PathBuf>,
    verbosity: u8,
}

impl Config {
    fn from_args(args: &[String]) -> anyhow::Result<Config> {
        let mut verbosity = 0;
        let mut output = None;
        let mut positional = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-v" => verbosity += 1,
                "-vv" => verbosity += 2,
                "-o" => match iter.next() {
                    Some(path) => output = Some(PathBuf::from(path)),
                    None => bail!("-o needs a path"),
                },
                _ => positional.push(arg.as_str()),
            }
        }

        let (command, input) = match positional.as_slice() {
            ["compile", input] => (Command::Compile, input),
            ["tokens", input] => (Command::Tokens, input),
            ["ast", input] => (Command::Ast, input),
            _ => bail!("expected a command and one input file"),
        };
        if output.is_some() && command != Command::Compile {
            bail!("-o only applies to compile");
        }

        Ok(Config {
            command,
            input: input.to_string(),
            output,
            verbosity,
        })
    }

    fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::Warn,
            1 => Level::Info,
            2 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Where `compile` writes its object code: `-o`, or the input with a
    /// `.tam` extension.
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None if self.input == "-" => PathBuf::from("out.tam"),
            None => Path::new(&self.input).with_extension("tam"),
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}\n");
            usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = simple_logger::init_with_level(config.log_level()) {
        eprintln!("failed to initialize logger: {err}");
    }

    if let Err(err) = run(&config) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let source = read_source(&config.input)?;
    match config.command {
        Command::Compile => {
            let compilation = Compilation::run(&source)?;
            let output = config.output_path();
            fs::write(&output, compilation.object_code.to_string())
                .with_context(|| format!("writing {:?}", output))?;
            info!(
                "compiled {} into {} instruction(s)",
                config.input,
                compilation.object_code.len()
            );
            println!("{}", output.display());
        }
        Command::Tokens => {
            let tokens = tokenize(&source);
            for token in tokens.tokens() {
                println!("{token}");
            }
            if let Some(err) = tokens.errors().first() {
                for err in tokens.errors() {
                    eprintln!("{err}");
                }
                return Err(err.clone().into());
            }
        }
        Command::Ast => {
            let tokens = tokenize(&source).into_result()?;
            let program = parser::parse(&tokens)?;
            print!("{}", print_program(&program));
        }
    }
    Ok(())
}

fn read_source(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("reading source from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(input).with_context(|| format!("reading {:?}", input))
}

fn usage() {
    println!("Usage:");
    println!("\tstackc [-v|-vv] <command> <input> [-o <output>]\n");
    println!("Commands:");
    println!("\tcompile\twrite object code to <output> (default: <input>.tam)");
    println!("\ttokens\tprint the token listing");
    println!("\tast\tprint the syntax tree");
    println!("\nUse - as <input> to read from stdin.");
}

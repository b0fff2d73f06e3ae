use clap::{arg,crate_version,Command};
use huffstream::{text_huff,Error};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();

    let long_help =
"Examples:
---------
Compress:      `huffstream compress fable.txt fable.huff`
Decompress:    `huffstream decompress fable.huff fable.txt`

Runs append a record to compression.txt or decompression.txt in the
working directory.";

    let mut main_cmd = Command::new("huffstream")
        .about("Compress and decompress text with adaptive Huffman coding")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("compress")
        .arg(arg!(<input> "input UTF-8 text path"))
        .arg(arg!(<output> "output path for the compressed stream"))
        .about("compress a text file"));
    main_cmd = main_cmd.subcommand(Command::new("decompress")
        .arg(arg!(<input> "compressed input path"))
        .arg(arg!(<output> "output text path"))
        .about("decompress into a text file"));

    let matches = match main_cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // clap would exit with 2, the exit policy here is 1 for any failure
            e.print()?;
            std::process::exit(1);
        }
    };

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        return text_huff::compress_file(path_in,path_out);
    }

    if let Some(cmd) = matches.subcommand_matches("decompress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        return text_huff::expand_file(path_in,path_out);
    }

    eprintln!("Usage: huffstream <compress|decompress> <input> <output>");
    Err(Box::new(Error::UsageError))
}

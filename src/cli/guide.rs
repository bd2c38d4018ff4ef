pub const USAGE_GUIDE: &str = "\
Exchange currency
  Convert an amount from one currency to another.
    xrate convert <SOURCE> <TARGET> <AMOUNT>
  Example: xrate convert USD EUR 100

Get exchange rate
  Get the exchange rate of a currency.
    xrate rate <SOURCE> [TARGET]
  With a target currency, only the rate between the two is shown.
  Without one, the rates for all currencies are listed.

Check API quota (admin)
  Check the remaining API requests using the admin credentials.
    xrate quota [--admin <NAME>] [--password <PASSWORD>]
  Missing credentials are prompted for.

Interactive shell
    xrate shell
  Results stay on screen for a few seconds, see 'status'.

Configuration
  API_KEY, ADMIN and PASSWORD are read from the environment or a .env file.
  Run 'xrate setup' to create a settings file.

Currency codes use the ISO 4217 format, e.g. USD, EUR, JPY.";

pub const SHELL_HELP: &str = "\
Commands:
  convert FROM TO AMOUNT   Convert an amount
  rate FROM [TO]           Show one rate, or all rates for FROM
  quota ADMIN PASSWORD     Show remaining API requests (admin only)
  status                   Show the current result of each panel
  help                     Show this help
  quit                     Leave the shell";

pub fn print_guide() {
    println!("{USAGE_GUIDE}");
}

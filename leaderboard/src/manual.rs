/*!

This is the long-form manual for `leaderboard` and `tlb`.

## Uploads

Each team uploads the account-history export of its trading account. The
file name must contain `account-history` (this can be changed in the
configuration with `uploads.fileNameMarker`). The following formats are
supported:

* `.csv` Comma Separated Values
* `.xlsx` Excel spreadsheet. The first worksheet is used, unless
  `uploads.excelWorksheetName` is set.

Both formats have a header row. Only the first data row is read:

|      | balance before | balance after | ... |
|------|----------------|---------------|-----|
| ...  | $100,000.00    | $101,250.00   |     |

The balance after may be `N/A` or empty. Amounts may be written plainly
(`100000`) or in currency notation (`$100,000.00`).

## How balances are ranked

The current balance of a team is:
- `$0.00` if the team has not uploaded anything,
- the balance before, if the balance after is `N/A` or is the same,
- the balance after otherwise.

Teams are sorted by decreasing current balance. Teams with the same balance
share the same rank and keep the order of the configuration. The next
balance gets the following rank, without gaps.

## Configuration

The `--config` flag takes a JSON file:

```json
{
  "outputSettings": {
    "competitionName": "SMIP TRADING LEADERBOARD",
    "outputDirectory": "out"
  },
  "teams": [{ "name": "TECH" }, { "name": "ENERGY" }],
  "persistence": { "provider": "csv", "filePath": "leaderboard.csv", "commit": true },
  "uploads": { "fileNameMarker": "account-history" },
  "deadline": "2024-12-04T00:00:00",
  "sessionFile": "session.json"
}
```

`provider` is `json` or `csv`. With `commit` set, every write of the
leaderboard is followed by a `git commit` of that file.

The `deadline` is a local date and time. `tlb --countdown` shows the time
left until then.

*/

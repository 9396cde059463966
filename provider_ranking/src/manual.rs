/*!

This is the long-form manual for `provider_ranking` and `provtally`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values
* `xlsx` Excel spreadsheets (also used by most export tools)

Both formats are read positionally: one column carries the provider name and
one column carries the access count. By default the name is the first column
and the count the second one, with a single header row. These positions can
be changed in the configuration file.

### `csv`

A plain comma-separated file:

```text
OPERADORA,ACESSOS
N-multimidia Telecomunicacoes Ltda,1250
NMULTIFIBRA TELECOMUNICACAO LTDA,340
CLARO S.A.,98000
```

### `xlsx`

The same layout inside an Excel worksheet. The first worksheet is used
unless `excelWorksheetName` selects another one. Counts may be stored as
integers, floats with no fractional part, or numeric strings.

## Quick start

Export the market-share spreadsheet from your reporting tool and run:

```bash
provtally --market-file Participacao_Mercado.xlsx
```

The ranking is printed as a table and the summary is written in JSON format
to the standard output. Add `--access-file Meio_Acesso.xlsx` to also
tabulate the access-method sheet, and `--search fibra` to look up a single
provider. The search ignores case and accents; when nothing matches, a "not
found" message is printed instead of an empty table.

## Configuration file

For anything beyond the defaults, pass a JSON configuration with
`--config`. File paths inside the configuration are relative to the
configuration file itself.

```json
{
  "outputSettings": {
    "reportName": "Dashboard Provedoras de Internet",
    "reportDate": "2024-06-01",
    "outputDirectory": "out"
  },
  "marketShareSource": {
    "provider": "xlsx",
    "filePath": "Participacao_Mercado.xlsx",
    "nameColumnIndex": 1,
    "countColumnIndex": 2,
    "firstDataRowIndex": 2
  },
  "accessMethodSource": {
    "provider": "csv",
    "filePath": "Meio_Acesso.csv"
  },
  "aliases": [
    {
      "variant": "NMULTIFIBRA TELECOMUNICACAO LTDA",
      "canonical": "N-multimidia Telecomunicacoes Ltda"
    }
  ],
  "sortOrder": "totalDescending"
}
```

All the indexes are 1-based, following the spreadsheet convention. The
aliases listed in the configuration extend the built-in table of known
variants; an alias whose variant and canonical spelling normalize to the
same name is accepted and ignored.

## Checking against a reference

`provtally --config report.json --reference expected_summary.json` compares
the computed summary with a reference file and fails with a printed diff if
they differ. This is convenient for regression-checking recurring exports.

*/

/*!

This is the long-form manual for `compsoc` and the `compsoc` simulator.

## Profiles

A profile is a list of weighted ballots. Each ballot is a complete, strict
ranking of the candidates (no ties, no abstentions) and is cast by `count`
voters:

```text
3: 0 > 1 > 2
2: 1 > 2 > 0
1: 2 > 0 > 1
```

Profiles are validated when they are built: there must be at least one
ballot, every count must be positive, and every ballot must rank the same
candidates exactly once.

## Rankings

`Profile::ranking` scores every candidate with a rule and sorts the candidates
by decreasing score. Candidates with the same score are sorted by increasing
identifier. With the profile above, the Borda ranking is
`[(0, 7), (1, 7), (2, 4)]`: candidates 0 and 1 are tied and 0 comes first.

## Rules

In the following, `n` is the number of candidates, `pos` is the position of
the candidate in a ballot (0 for the first choice) and `P(a, b)` is the number
of voters who rank `a` above `b`.

### `borda`

Every voter gives `n - 1 - pos` points.

### `dowdall`

Every voter gives `1 / (pos + 1)` points.

### `borda_gamma_<gamma>`

Every voter gives `gamma^pos` points. `gamma` must be in `(0, 1]`. With
`gamma = 1` all the candidates get the same score, and small values of `gamma`
behave like the plurality rule. The simulator evaluates the decays
`1.0, 0.99, 0.75, 0.6, 0.25, 0.01` unless configured otherwise.

### `copeland`

The number of opponents `b` such that `P(a, b) > P(b, a)`, minus the number of
opponents such that `P(a, b) < P(b, a)`. Pairwise ties count for nothing. A
Condorcet winner always gets `n - 1`.

### `simpson`

The minimum of `P(a, b)` over all the opponents `b`. Raw counts are used,
not margins. A lone candidate gets the total number of voters.

## Utility

Each voter derives a utility from the elected order. The utility of the
candidate elected at position `i` is `(n - i) / n`. The `top` utility is the
utility of the voter's first choice, and the `topn` utility sums the utilities
of the voter's first `topn` choices. Both are weighted by the ballot count and
summed over the profile.

## Voter models

* `random` every voter picks a uniformly random ranking.
* `gaussian` all the `n!` rankings are laid out in lexicographic order and
   receive voters following a discretized normal distribution (parameters `mu`
   and `stdv`, 2 and 1 by default). No randomness is involved. At most 8
   candidates are supported.
* `multinomial_dirichlet` a popularity vector `p` is drawn from a Dirichlet
   distribution with parameters `alpha` (drawn uniformly in `(0, 1)` when not
   provided), then every voter ranks the candidates by drawing them without
   replacement with probabilities proportional to `p`.

## Command line

```bash
compsoc 5 1000 20 2 multinomial_dirichlet --seed 42 --out results.json
```

The positional arguments are the number of candidates, of voters, of
iterations, the `topn` value and the voter model. All of them may also be
provided in a configuration file with `--config`:

```json
{
  "numCandidates": 5,
  "numVoters": 1000,
  "numIterations": 20,
  "numTopn": 2,
  "votersModel": "multinomial_dirichlet",
  "seed": 42,
  "gammas": [1.0, 0.75, 0.25],
  "dirichlet": { "alpha": [1.1, 2.5, 3.8, 2.1, 1.3] },
  "gaussian": { "mu": 2.0, "stdv": 1.0 },
  "outputPath": "results.json"
}
```

Values given on the command line take precedence over the configuration file.
When no seed is provided, one is drawn and printed in the logs so that the run
can be reproduced.

## Output

At the end of a run, a table with the mean and the standard deviation of the
`top` and `topn` utilities of each rule across the iterations is printed.
With `--out <path>` the settings, the summary and the elected order and
utilities of every rule in every iteration are also written as JSON. Pass
`--out stdout` to print the JSON instead.

 */
